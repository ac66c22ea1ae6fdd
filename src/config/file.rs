//! Configuration file management for taper.
//!
//! Settings live in `~/.config/taper/taper.toml`. A file with default values is
//! written on first run so users have something to edit.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `taper list-devices`
    /// - device name from `taper list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Preferred sample rate in Hz; the device's native rate wins if they differ
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Output audio format string: "codec [ffmpeg_options]" (e.g., "mp3 -ab 64k")
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Ask before the first capture of each session
    #[serde(default = "default_true")]
    pub confirm_microphone_access: bool,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_output_format() -> String {
    "mp3 -ab 64k".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
            output_format: default_output_format(),
            confirm_microphone_access: true,
        }
    }
}

/// Where recordings are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory for recording files; defaults to the user cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolves the directory recordings are written to.
    ///
    /// # Errors
    /// - If no cache directory is configured and the platform has none
    pub fn resolve_cache_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::cache_dir()
                .map(|dir| dir.join("taper"))
                .ok_or_else(|| anyhow!("Could not determine cache directory")),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaperConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TaperConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Writes configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Writes the default configuration if no config file exists yet.
///
/// Returns the config file path.
pub fn ensure_config() -> anyhow::Result<PathBuf> {
    let path = get_config_path()?;
    if !path.exists() {
        tracing::info!("No config found, writing defaults");
        TaperConfig::default().save_to(&path)?;
    }
    Ok(path)
}

/// Path of the config file: `~/.config/taper/taper.toml`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("taper").join("taper.toml"))
}
