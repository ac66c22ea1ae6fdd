//! taper: a terminal voice-memo recorder.
//!
//! Captures microphone input to compressed files, lists the clips recorded
//! during the session newest first, and plays them back on demand.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod recording;
pub mod screen;
pub mod ui;
