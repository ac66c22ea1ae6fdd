//! Shared terminal UI screens.

pub mod error;

pub use error::report_fatal;
