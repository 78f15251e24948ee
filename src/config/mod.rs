//! Configuration module for the Pixabay search provider
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "PIXABAY_SEARCH_SETTINGS";

/// Locations searched for `settings.yml`, in order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("pixabay-search/settings.yml"));
    }
    paths
}

/// Load settings from an explicit path, the environment, the default paths,
/// or fall back to defaults. Environment overrides are applied last.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let from_env = std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from);

    // An explicit path must exist; the others are only probed.
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => from_env
            .filter(|p| p.exists())
            .or_else(|| default_paths().into_iter().find(|p| p.exists())),
    };

    let mut settings = match candidate {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}
