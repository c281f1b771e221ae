//! Configuration resolution for fixcam-dx
//!
//! Provides two-tier resolution with ENV → TOML priority and compiled
//! defaults for everything except the API key, which must be supplied.

use fixcam_common::config::TomlConfig;
use fixcam_common::{Error, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Default vision model (multimodal analysis)
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-pro";
/// Default image generation model
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 8001;

/// Resolved service configuration, read-only after startup
#[derive(Debug, Clone)]
pub struct DxConfig {
    pub gemini_api_key: String,
    pub vision_model: String,
    pub image_model: String,
    pub port: u16,
    pub database_path: PathBuf,
}

/// Resolve full service configuration from ENV and the TOML config file.
pub fn resolve_config(toml_config: &TomlConfig) -> Result<DxConfig> {
    let gemini_api_key = resolve_gemini_api_key(toml_config)?;

    let vision_model = std::env::var("FIXCAM_VISION_MODEL")
        .ok()
        .filter(|v| is_valid_key(v))
        .or_else(|| toml_config.vision_model.clone())
        .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string());

    let image_model = std::env::var("FIXCAM_IMAGE_MODEL")
        .ok()
        .filter(|v| is_valid_key(v))
        .or_else(|| toml_config.image_model.clone())
        .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

    let port = std::env::var("FIXCAM_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .or(toml_config.port)
        .unwrap_or(DEFAULT_PORT);

    let data_folder = fixcam_common::config::resolve_data_folder("FIXCAM_DATA_FOLDER", toml_config);
    let database_path = data_folder.join("fixcam.db");

    Ok(DxConfig {
        gemini_api_key,
        vision_model,
        image_model,
        port,
        database_path,
    })
}

/// Resolve Gemini API key from 2-tier configuration
///
/// **Priority:** ENV → TOML
pub fn resolve_gemini_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var("FIXCAM_GEMINI_API_KEY").ok();
    let toml_key = toml_config.gemini_api_key.as_ref();

    let mut sources = Vec::new();
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }
    if toml_key.is_some_and(|k| is_valid_key(k)) {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "Gemini API key found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("Gemini API key loaded from environment variable");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            info!("Gemini API key loaded from TOML config");
            return Ok(key.clone());
        }
    }

    Err(Error::Config(
        "Gemini API key not configured. Please configure using one of:\n\
         1. Environment: FIXCAM_GEMINI_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/fixcam/config.toml (gemini_api_key = \"your-key\")"
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
