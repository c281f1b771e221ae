//! fixcam-dx library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::services::gemini_client::VisionModel;
use crate::services::imagen_client::ImageModel;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Injected vision model used by the diagnosis pipeline
    pub vision: Arc<dyn VisionModel>,
    /// Injected image model used for step illustrations
    pub imagen: Arc<dyn ImageModel>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, vision: Arc<dyn VisionModel>, imagen: Arc<dyn ImageModel>) -> Self {
        Self {
            db,
            vision,
            imagen,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Health lives at the root; everything else is nested under /api. The
/// banner is registered at "/api/" explicitly because nesting maps the
/// inner "/" route to "/api" without the trailing slash.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(api::project_routes())
        .merge(api::diagnose_routes())
        .merge(api::step_image_routes());

    Router::new()
        .merge(api::health_routes())
        .route("/api/", get(api::projects::banner))
        .nest("/api", api)
        // Uploads carry whole videos inline; the default 2 MB body cap
        // would reject them before the handler runs
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
