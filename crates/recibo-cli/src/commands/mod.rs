//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod detect;
pub mod report;
pub mod validate;

use std::path::{Path, PathBuf};

use tracing::debug;

use recibo_core::ReciboConfig;

/// Platform configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recibo")
        .join("config.json")
}

/// Load the configuration from `--config`, else from the platform
/// location when present, else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ReciboConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(ReciboConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(ReciboConfig::from_file(&default_path)?)
    } else {
        Ok(ReciboConfig::default())
    }
}

/// Read a receipt text file.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(std::fs::read_to_string(path)?)
}
