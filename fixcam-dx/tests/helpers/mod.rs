//! Test helper utilities
//!
//! Shared mocks and fixtures for fixcam-dx integration tests.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, RgbImage};
use std::io::Cursor;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use fixcam_dx::error::DiagnosisError;
use fixcam_dx::services::gemini_client::VisionModel;
use fixcam_dx::services::imagen_client::ImageModel;
use fixcam_dx::services::media_normalizer::NormalizedMedia;
use fixcam_dx::AppState;

/// Vision mock returning a fixed response and counting calls
pub struct MockVision {
    pub response: String,
    pub calls: AtomicUsize,
}

#[async_trait]
impl VisionModel for MockVision {
    async fn analyze(
        &self,
        _system_context: &str,
        _prompt: &str,
        _media: &NormalizedMedia,
    ) -> Result<String, DiagnosisError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Image mock returning fixed bytes (None simulates a filtered prompt)
pub struct MockImage {
    pub bytes: Option<Vec<u8>>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ImageModel for MockImage {
    async fn generate(&self, _prompt: &str) -> Result<Option<Vec<u8>>, DiagnosisError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// Create test app with in-memory database and canned provider responses
pub async fn create_test_app(
    vision_response: &str,
    image_bytes: Option<Vec<u8>>,
) -> (
    axum::Router,
    sqlx::SqlitePool,
    Arc<MockVision>,
    Arc<MockImage>,
) {
    let pool = sqlx::SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    fixcam_dx::db::init_tables(&pool)
        .await
        .expect("Failed to initialize database schema");

    let vision = Arc::new(MockVision {
        response: vision_response.to_string(),
        calls: AtomicUsize::new(0),
    });
    let imagen = Arc::new(MockImage {
        bytes: image_bytes,
        calls: AtomicUsize::new(0),
    });

    let state = AppState::new(pool.clone(), vision.clone(), imagen.clone());
    let app = fixcam_dx::build_router(state);

    (app, pool, vision, imagen)
}

/// A plausible model response for a leaking faucet, wrapped in a JSON fence
pub fn faucet_response() -> String {
    let record = serde_json::json!({
        "title": "Fix Leaky Kitchen Faucet",
        "hardware_identified": "Single-handle cartridge faucet",
        "issue_type": "Leak",
        "description": "Worn cartridge causing a steady drip at the spout",
        "skill_level": 2,
        "estimated_time": "1-2 hours",
        "safety_warnings": ["Shut off the water supply before starting"],
        "steps": [
            {
                "step_number": 1,
                "title": "Shut off water",
                "description": "Close both supply valves under the sink",
                "image_hint": "supply valves under a kitchen sink"
            },
            {
                "step_number": 2,
                "title": "Replace cartridge",
                "description": "Pull the old cartridge and seat the new one",
                "warning": "Note the cartridge orientation before removal"
            }
        ],
        "materials": [{"name": "Replacement cartridge", "estimated_cost": "$15-25"}],
        "tools": [{"name": "Adjustable wrench"}, {"name": "Hex key set"}]
    });
    format!("```json\n{}\n```", record)
}

/// Small valid PNG, base64-encoded without any data-URI prefix
pub fn png_base64() -> String {
    BASE64.encode(png_bytes())
}

/// Small valid PNG as raw bytes
pub fn png_bytes() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 24, image::Rgb([160, 60, 40])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub const MULTIPART_BOUNDARY: &str = "fixcam-test-boundary";

/// Build a multipart/form-data body by hand
pub fn multipart_body(
    file: Option<(&str, &[u8])>,
    thumbnail_base64: Option<&str>,
    description: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some((content_type, bytes)) = file {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\n\
                 Content-Type: {}\r\n\r\n",
                content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(thumb) = thumbnail_base64 {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"thumbnail_base64\"\r\n\r\n",
        );
        body.extend_from_slice(thumb.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some(desc) = description {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"description\"\r\n\r\n");
        body.extend_from_slice(desc.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}
