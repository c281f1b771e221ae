//! Media normalization
//!
//! Turns any accepted input (inline base64 image, uploaded image, uploaded
//! video with caller-supplied thumbnail) into an in-memory media unit for
//! inference plus canonical preview strings for storage. Nothing ever
//! touches disk; the service stays stateless across deploys.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use fixcam_common::data_uri;
use std::io::Cursor;

use crate::error::DiagnosisError;

/// Thumbnail bound for the list view
const THUMBNAIL_MAX_DIM: u32 = 320;
const THUMBNAIL_JPEG_QUALITY: u8 = 70;
/// MIME assumed when sniffing fails (inline captures are JPEG in practice)
const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Canonical in-memory media unit plus persisted-preview strings
#[derive(Debug, Clone)]
pub struct NormalizedMedia {
    /// Raw bytes handed to the inference call
    pub bytes: Vec<u8>,
    /// MIME type describing `bytes`
    pub mime: String,
    /// True when the upload was classified as video
    pub is_video: bool,
    /// Canonical data URI of the submitted media preview
    pub primary_image: String,
    /// Canonical data URI of the list-view thumbnail
    pub thumbnail_image: String,
}

/// Normalize an inline base64 image submission.
///
/// Any existing data-URI prefix is stripped before decoding; decode failure
/// is the client's fault and maps to InvalidMedia. Thumbnail derivation is
/// best-effort: when the bytes can't be decoded as an image the original
/// preview is stored as the thumbnail instead, and project creation
/// proceeds.
pub fn normalize_inline(image_base64: &str) -> Result<NormalizedMedia, DiagnosisError> {
    let payload = data_uri::strip_prefix(image_base64).trim();
    if payload.is_empty() {
        return Err(DiagnosisError::InvalidMedia("Image is required".to_string()));
    }

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| DiagnosisError::InvalidMedia(format!("Invalid base64 image: {}", e)))?;

    let mime = infer::get(&bytes)
        .map(|t| t.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string());

    let primary_image = data_uri::normalize(&mime, payload);

    let thumbnail_image = match derive_thumbnail(&bytes) {
        Some(thumb) => thumb,
        None => {
            tracing::warn!("Thumbnail derivation failed; storing original image as thumbnail");
            primary_image.clone()
        }
    };

    Ok(NormalizedMedia {
        bytes,
        mime,
        is_video: false,
        primary_image,
        thumbnail_image,
    })
}

/// Normalize an uploaded binary with a declared MIME type.
///
/// Classification is purely by MIME prefix. Video uploads cannot be
/// previewed server-side, so the caller-supplied thumbnail becomes the
/// canonical preview; it is normalized to exactly one data-URI prefix no
/// matter how the client wrapped it.
pub fn normalize_upload(
    bytes: Vec<u8>,
    declared_mime: &str,
    thumbnail_base64: Option<&str>,
) -> Result<NormalizedMedia, DiagnosisError> {
    if bytes.is_empty() {
        return Err(DiagnosisError::InvalidMedia("Uploaded file is empty".to_string()));
    }

    let is_video = declared_mime.starts_with("video/");

    let caller_thumbnail = thumbnail_base64
        .map(|t| {
            // Keep the MIME the client declared; only bare payloads fall
            // back to JPEG
            let mime = data_uri::mime_type(t).unwrap_or(FALLBACK_IMAGE_MIME);
            data_uri::normalize(mime, t)
        })
        .filter(|t| !t.is_empty());

    if is_video {
        let thumbnail = caller_thumbnail.ok_or_else(|| {
            DiagnosisError::InvalidMedia(
                "Video uploads require a thumbnail for the preview".to_string(),
            )
        })?;

        return Ok(NormalizedMedia {
            bytes,
            mime: declared_mime.to_string(),
            is_video: true,
            primary_image: thumbnail.clone(),
            thumbnail_image: thumbnail,
        });
    }

    let primary_image = data_uri::normalize(declared_mime, &BASE64.encode(&bytes));
    let thumbnail_image = caller_thumbnail.unwrap_or_else(|| primary_image.clone());

    Ok(NormalizedMedia {
        bytes,
        mime: declared_mime.to_string(),
        is_video: false,
        primary_image,
        thumbnail_image,
    })
}

/// Derive a bounded thumbnail, re-encoded as reduced-quality JPEG.
///
/// Returns None when the bytes are not a decodable image; callers fall
/// back to the original preview.
fn derive_thumbnail(bytes: &[u8]) -> Option<String> {
    let img = image::load_from_memory(bytes).ok()?;
    let thumb = img.thumbnail(THUMBNAIL_MAX_DIM, THUMBNAIL_MAX_DIM);

    let mut buf = Cursor::new(Vec::new());
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, THUMBNAIL_JPEG_QUALITY);
    encoder.encode_image(&thumb.to_rgb8()).ok()?;

    Some(data_uri::normalize(
        FALLBACK_IMAGE_MIME,
        &BASE64.encode(buf.into_inner()),
    ))
}
