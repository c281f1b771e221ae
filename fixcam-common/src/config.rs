//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents (`~/.config/fixcam/config.toml`)
///
/// All fields are optional; environment variables take priority over the
/// file, and compiled defaults fill whatever remains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the SQLite database
    pub data_folder: Option<String>,
    /// Gemini API key (env `FIXCAM_GEMINI_API_KEY` takes priority)
    pub gemini_api_key: Option<String>,
    /// Vision model identifier override
    pub vision_model: Option<String>,
    /// Image generation model identifier override
    pub image_model: Option<String>,
    /// HTTP listen port override
    pub port: Option<u16>,
}

/// Resolve the data folder following priority order:
/// 1. Environment variable (highest priority)
/// 2. TOML config file
/// 3. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(env_var_name: &str, toml_config: &TomlConfig) -> PathBuf {
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(folder) = &toml_config.data_folder {
        if !folder.trim().is_empty() {
            return PathBuf::from(folder);
        }
    }

    default_data_folder()
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fixcam").join("config.toml"))
}

/// Load the TOML config file, returning defaults if it does not exist.
///
/// A present-but-unparseable file is a hard error: silently ignoring a
/// config the operator wrote leads to confusing misconfiguration.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(TomlConfig::default()),
        },
    };

    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))?;

    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Get OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fixcam"))
        .unwrap_or_else(|| PathBuf::from("./fixcam_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_toml_config(Some(Path::new("/nonexistent/fixcam.toml"))).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert!(config.port.is_none());
    }

    #[test]
    fn test_load_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "gemini_api_key = \"test-key\"\nport = 9000\nvision_model = \"gemini-2.5-pro\"\n",
        )
        .unwrap();

        let config = load_toml_config(Some(&path)).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("test-key"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.vision_model.as_deref(), Some("gemini-2.5-pro"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is { not toml").unwrap();

        assert!(load_toml_config(Some(&path)).is_err());
    }

    #[test]
    fn test_resolve_data_folder_prefers_toml_over_default() {
        let config = TomlConfig {
            data_folder: Some("/tmp/fixcam-test-data".to_string()),
            ..Default::default()
        };
        // Env var name chosen to be unset in any sane environment
        let folder = resolve_data_folder("FIXCAM_TEST_UNSET_DATA_FOLDER", &config);
        assert_eq!(folder, PathBuf::from("/tmp/fixcam-test-data"));
    }
}
