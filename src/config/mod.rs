//! Configuration management for taper.
//!
//! Loads and saves the TOML settings file in the user's config directory.

pub mod file;

pub use file::{ensure_config, get_config_path, AudioConfig, StorageConfig, TaperConfig};
