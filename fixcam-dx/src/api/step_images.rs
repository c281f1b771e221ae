//! Step illustration endpoints
//!
//! GET returns whatever is stored; POST generates on first call and
//! returns the cached images afterwards.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::services::asset_generator::{AssetGenerator, EnsureStatus};
use crate::AppState;

/// GET .../images response
#[derive(Debug, Serialize)]
pub struct StepImagesResponse {
    pub success: bool,
    pub images: Vec<String>,
}

/// POST .../generate-images response
#[derive(Debug, Serialize)]
pub struct GenerateImagesResponse {
    pub success: bool,
    pub images: Vec<String>,
    pub message: String,
}

/// GET /projects/{id}/steps/{step_id}/images
pub async fn get_step_images(
    State(state): State<AppState>,
    Path((project_id, step_id)): Path<(String, String)>,
) -> ApiResult<Json<StepImagesResponse>> {
    let images = db::steps::get_step_images(&state.db, &project_id, &step_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(StepImagesResponse {
        success: true,
        images,
    }))
}

/// POST /projects/{id}/steps/{step_id}/generate-images
///
/// Idempotent: repeat calls after a success return the stored images
/// without another provider call. A failed generation leaves the step
/// retryable and reports success=false.
pub async fn generate_step_images(
    State(state): State<AppState>,
    Path((project_id, step_id)): Path<(String, String)>,
) -> ApiResult<Json<GenerateImagesResponse>> {
    let generator = AssetGenerator::new(state.imagen.clone());
    let outcome = generator
        .ensure_step_images(&state.db, &project_id, &step_id)
        .await?;

    Ok(Json(GenerateImagesResponse {
        success: outcome.status != EnsureStatus::Failed,
        images: outcome.images,
        message: outcome.message,
    }))
}

/// Build step image routes
pub fn step_image_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:project_id/steps/:step_id/images",
            get(get_step_images),
        )
        .route(
            "/projects/:project_id/steps/:step_id/generate-images",
            post(generate_step_images),
        )
}
