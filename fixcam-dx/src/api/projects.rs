//! Project CRUD and ownership toggle handlers

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::ApiResult;
use crate::models::Project;
use crate::AppState;

/// GET / response (service banner)
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: String,
    pub status: String,
}

/// GET /projects response
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}

/// GET /projects/{id} response
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub project: Project,
}

/// POST /projects/{id}/toggle-item request
#[derive(Debug, Deserialize)]
pub struct ToggleItemRequest {
    pub item_id: String,
    pub owned: bool,
}

/// Mutation acknowledgement
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// GET /
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "fixcam diagnosis API".to_string(),
        status: "running".to_string(),
    })
}

/// GET /projects
///
/// List saved projects newest-first. List rows carry the thumbnail only;
/// the primary image is omitted to keep the payload small.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<ProjectListResponse>> {
    let projects = db::projects::list_projects(&state.db).await?;
    Ok(Json(ProjectListResponse { projects }))
}

/// GET /projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = db::projects::find_project(&state.db, &project_id).await?;
    Ok(Json(ProjectResponse { project }))
}

/// DELETE /projects/{id}
///
/// Unconditional and irreversible.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<AckResponse>> {
    db::projects::delete_project(&state.db, &project_id).await?;

    tracing::info!(project_id = %project_id, "Project deleted");

    Ok(Json(AckResponse {
        success: true,
        message: "Project deleted".to_string(),
    }))
}

/// POST /projects/{id}/toggle-item
///
/// Toggle whether the user already owns a material or tool.
pub async fn toggle_item(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<ToggleItemRequest>,
) -> ApiResult<Json<AckResponse>> {
    db::items::set_item_owned(&state.db, &project_id, &request.item_id, request.owned).await?;

    Ok(Json(AckResponse {
        success: true,
        message: "Item updated".to_string(),
    }))
}

/// Build project routes
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/projects", get(list_projects))
        .route("/projects/:project_id", get(get_project))
        .route("/projects/:project_id", delete(delete_project))
        .route("/projects/:project_id/toggle-item", post(toggle_item))
}
