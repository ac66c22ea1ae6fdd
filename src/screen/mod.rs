//! Recorder screen: event-driven controller, recordings list and terminal host.

pub mod controller;
pub mod list;
pub mod tui;

pub use controller::{ListChange, Notice, NoticeLevel, ScreenController, ScreenEvent};
pub use list::{ListPresenter, RecordingRow, RowSource};
pub use tui::RecorderScreen;
