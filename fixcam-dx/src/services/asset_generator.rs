//! On-demand step illustration generation
//!
//! At most one successful generation per step, enforced by checking the
//! stored images before invoking the provider. The check-then-generate
//! sequence is deliberately not protected by a lock or claim: two
//! concurrent calls for the same step can both generate, with the second
//! write overwriting the first. `images_generating` is advisory only.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use fixcam_common::data_uri;
use sqlx::SqlitePool;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db;
use crate::error::DiagnosisError;
use crate::services::imagen_client::ImageModel;
use crate::services::prompt_builder;

/// Bound on stored generated images, regardless of the model's native
/// output size
const GENERATED_MAX_DIM: u32 = 768;
const GENERATED_JPEG_QUALITY: u8 = 80;

/// Outcome status of one ensure call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureStatus {
    /// Images already existed; no provider call was made
    AlreadyGenerated,
    /// A new image was generated and attached
    Generated,
    /// Generation failed; the step is unchanged and retryable
    Failed,
}

/// Result of `ensure_step_images`
#[derive(Debug, Clone)]
pub struct EnsureOutcome {
    pub status: EnsureStatus,
    pub images: Vec<String>,
    pub message: String,
}

/// Asset generator with its injected image-model dependency
pub struct AssetGenerator {
    image_model: Arc<dyn ImageModel>,
}

impl AssetGenerator {
    pub fn new(image_model: Arc<dyn ImageModel>) -> Self {
        Self { image_model }
    }

    /// Ensure one step has an illustrative image, generating it on first
    /// call and returning the cached result afterwards.
    ///
    /// NotFound propagates as an error; provider/decode failures are soft
    /// outcomes that leave the step eligible for retry.
    pub async fn ensure_step_images(
        &self,
        pool: &SqlitePool,
        project_id: &str,
        step_id: &str,
    ) -> Result<EnsureOutcome, DiagnosisError> {
        let project = db::projects::find_project(pool, project_id).await?;

        let step = project
            .steps
            .iter()
            .find(|s| s.id == step_id)
            .ok_or_else(|| {
                DiagnosisError::NotFound(format!(
                    "Project {} has no step {}",
                    project_id, step_id
                ))
            })?;

        // Idempotency: at most one successful generation per step
        if !step.generated_images.is_empty() {
            return Ok(EnsureOutcome {
                status: EnsureStatus::AlreadyGenerated,
                images: step.generated_images.clone(),
                message: "Images already generated".to_string(),
            });
        }

        db::steps::set_images_generating(pool, project_id, step_id, true).await?;

        let prompt = prompt_builder::build_step_image_prompt(
            &project.title,
            &step.title,
            &step.description,
            step.image_hint.as_deref(),
        );

        let result = self.image_model.generate(&prompt).await;

        let bytes = match result {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                db::steps::set_images_generating(pool, project_id, step_id, false).await?;
                warn!(project_id, step_id, "Provider returned no image");
                return Ok(EnsureOutcome {
                    status: EnsureStatus::Failed,
                    images: Vec::new(),
                    message: "Image generation produced no image".to_string(),
                });
            }
            Err(e) => {
                db::steps::set_images_generating(pool, project_id, step_id, false).await?;
                warn!(project_id, step_id, error = %e, "Image generation failed");
                return Ok(EnsureOutcome {
                    status: EnsureStatus::Failed,
                    images: Vec::new(),
                    message: e.to_string(),
                });
            }
        };

        let image_uri = match encode_bounded(&bytes) {
            Some(uri) => uri,
            None => {
                db::steps::set_images_generating(pool, project_id, step_id, false).await?;
                warn!(project_id, step_id, "Generated image could not be decoded");
                return Ok(EnsureOutcome {
                    status: EnsureStatus::Failed,
                    images: Vec::new(),
                    message: "Generated image could not be decoded".to_string(),
                });
            }
        };

        let images = vec![image_uri];
        db::steps::attach_generated_images(pool, project_id, step_id, &images).await?;

        info!(project_id, step_id, "Step image generated and attached");

        Ok(EnsureOutcome {
            status: EnsureStatus::Generated,
            images,
            message: "Image generated".to_string(),
        })
    }
}

/// Downscale to the stored bound and encode as a JPEG data URI.
fn encode_bounded(bytes: &[u8]) -> Option<String> {
    let img = image::load_from_memory(bytes).ok()?;
    let bounded = if img.width() > GENERATED_MAX_DIM || img.height() > GENERATED_MAX_DIM {
        img.thumbnail(GENERATED_MAX_DIM, GENERATED_MAX_DIM)
    } else {
        img
    };

    let mut buf = Cursor::new(Vec::new());
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, GENERATED_JPEG_QUALITY);
    encoder.encode_image(&bounded.to_rgb8()).ok()?;

    Some(data_uri::normalize(
        "image/jpeg",
        &BASE64.encode(buf.into_inner()),
    ))
}
