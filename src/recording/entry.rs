//! A single finished recording and its display formatting.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One captured clip. Built once when a capture stops and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    name: String,
    path: PathBuf,
    duration: String,
    timestamp: DateTime<Local>,
}

impl Recording {
    /// Creates an entry for a capture that finished at `timestamp`.
    ///
    /// The display name and duration string are derived here and never
    /// recomputed afterwards.
    pub fn new(path: PathBuf, elapsed: Duration, timestamp: DateTime<Local>) -> Self {
        Self {
            name: recording_name(&timestamp),
            path,
            duration: format_duration(elapsed),
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the encoded audio file. The file itself belongs to the filesystem.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duration as `M:SS`.
    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Date shown in the recordings list, e.g. `Oct 19, 2026`.
    pub fn display_date(&self) -> String {
        self.timestamp.format("%b %-d, %Y").to_string()
    }
}

/// Formats an elapsed time as `minutes:seconds`.
///
/// Minutes are unbounded and seconds are always two digits, so an hour and a
/// bit renders as `61:01`. Sub-second remainders are truncated.
pub fn format_duration(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let secs = total_secs % 60;
    format!("{minutes}:{secs:02}")
}

/// Display name derived from the moment a capture finished.
fn recording_name(finished_at: &DateTime<Local>) -> String {
    format!("Recording_{}", finished_at.format("%Y%m%d_%H%M%S"))
}
