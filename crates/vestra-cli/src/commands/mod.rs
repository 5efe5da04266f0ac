//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use tracing::debug;
use vestra_core::models::config::VestraConfig;

/// Platform config file location (`<config dir>/vestra/config.json`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vestra")
        .join("config.json")
}

/// Config file path: the `--config` argument if given, else the platform default.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, the platform default file, or defaults.
///
/// An explicit `--config` path must exist; the platform default is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<VestraConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(VestraConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(VestraConfig::from_file(&default_path)?)
    } else {
        Ok(VestraConfig::default())
    }
}
