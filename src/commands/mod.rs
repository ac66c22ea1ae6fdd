//! Application command handlers for taper.
//!
//! # Commands
//! - `record`: the interactive recorder screen (default)
//! - `list_devices`: list available audio input devices
//! - `logs`: display recent log entries
//! - `config`: open the configuration file in the user's editor

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod record;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use record::handle_record;
