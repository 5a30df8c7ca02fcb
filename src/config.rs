// src/config.rs

//! Configuration loading utilities.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Config;

/// A validated configuration together with the directory its relative
/// paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub base_path: PathBuf,
}

/// Load and validate configuration from a TOML file.
///
/// A missing or malformed file is an error; there is no fallback to
/// defaults, since a run without locations and keywords is meaningless.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    if !path.exists() {
        return Err(AppError::config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let config = Config::load(path)?;
    config.validate()?;
    for warning in config.warnings() {
        log::warn!("{}", warning);
    }

    Ok(LoadedConfig {
        config,
        base_path: base_dir(path),
    })
}

/// Directory containing `path`, or `.` for a bare file name.
pub fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
