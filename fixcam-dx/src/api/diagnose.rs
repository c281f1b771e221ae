//! Diagnosis API handlers
//!
//! POST /diagnose (inline base64 image), POST /diagnose-upload
//! (multipart image or video). Both run the same pipeline; only media
//! normalization differs.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::Project;
use crate::services::diagnosis::DiagnosisPipeline;
use crate::services::media_normalizer;
use crate::AppState;

/// POST /diagnose request
#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    pub image_base64: String,
    #[serde(default)]
    pub description: String,
}

/// Diagnosis response wrapper
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub project: Project,
}

/// POST /diagnose
///
/// Analyze an inline base64 image and create a repair project.
pub async fn diagnose(
    State(state): State<AppState>,
    Json(request): Json<DiagnoseRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    if request.image_base64.trim().is_empty() {
        return Err(ApiError::BadRequest("Image is required".to_string()));
    }

    let media = media_normalizer::normalize_inline(&request.image_base64)
        .map_err(ApiError::from)?;

    let description = (!request.description.trim().is_empty()).then_some(request.description.as_str());

    let pipeline = DiagnosisPipeline::new(state.vision.clone());
    let project = pipeline.run(&state.db, media, description).await?;

    Ok(Json(ProjectResponse { project }))
}

/// POST /diagnose-upload
///
/// Analyze an uploaded image or video (multipart). Videos must carry a
/// caller-supplied thumbnail for the stored preview. The upload is held
/// in memory only; nothing is written to disk.
pub async fn diagnose_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProjectResponse>> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut declared_mime: Option<String> = None;
    let mut thumbnail_base64: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                declared_mime = field.content_type().map(|c| c.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("thumbnail_base64") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid thumbnail field: {}", e)))?;
                if !text.trim().is_empty() {
                    thumbnail_base64 = Some(text);
                }
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid description field: {}", e)))?;
                if !text.trim().is_empty() {
                    description = Some(text);
                }
            }
            _ => {}
        }
    }

    let file_bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let declared_mime = declared_mime
        .ok_or_else(|| ApiError::BadRequest("File content type is required".to_string()))?;

    let media = media_normalizer::normalize_upload(
        file_bytes,
        &declared_mime,
        thumbnail_base64.as_deref(),
    )
    .map_err(ApiError::from)?;

    let pipeline = DiagnosisPipeline::new(state.vision.clone());
    let project = pipeline.run(&state.db, media, description.as_deref()).await?;

    Ok(Json(ProjectResponse { project }))
}

/// Build diagnosis routes
pub fn diagnose_routes() -> Router<AppState> {
    Router::new()
        .route("/diagnose", post(diagnose))
        .route("/diagnose-upload", post(diagnose_upload))
}
