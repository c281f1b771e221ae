//! fixcam-dx - Defect Diagnosis Microservice
//!
//! Turns a photo or short video of a household defect into a persisted
//! repair project: multimodal analysis, structured extraction, and
//! on-demand per-step illustration generation.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fixcam_dx::services::gemini_client::GeminiClient;
use fixcam_dx::services::imagen_client::ImagenClient;
use fixcam_dx::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting fixcam-dx (Defect Diagnosis) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration: ENV over TOML, compiled defaults last
    let toml_config = fixcam_common::config::load_toml_config(None)?;
    let config = fixcam_dx::config::resolve_config(&toml_config)?;

    info!("Vision model: {}", config.vision_model);
    info!("Image model: {}", config.image_model);
    info!("Database: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_pool = fixcam_dx::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let vision: Arc<dyn fixcam_dx::services::gemini_client::VisionModel> = Arc::new(
        GeminiClient::new(config.gemini_api_key.clone(), config.vision_model.clone())?,
    );
    let imagen: Arc<dyn fixcam_dx::services::imagen_client::ImageModel> = Arc::new(
        ImagenClient::new(config.gemini_api_key.clone(), config.image_model.clone())?,
    );

    let state = AppState::new(db_pool, vision, imagen);
    let app = fixcam_dx::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
