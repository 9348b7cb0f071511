pub mod playback_config;

pub use playback_config::PlaybackConfig;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the macro file when no path is configured
pub const MACRO_FILE_NAME: &str = "macros.csv";

/// Main configuration structure matching config.yaml format
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub library_path: Option<PathBuf>,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Config {
    /// Load configuration from YAML file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config =
            serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML config file")?;

        Ok(config)
    }

    /// Load the given config file, or defaults when none is given
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Configured macro file path with `~` expanded, or the default location
    pub fn library_path(&self) -> PathBuf {
        self.library_path
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(default_library_path)
    }
}

/// `macros.csv` on the desktop, falling back to the home directory
pub fn default_library_path() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(MACRO_FILE_NAME)
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
