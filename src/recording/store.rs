//! In-memory list of recordings made during this session.

use super::entry::Recording;
use std::collections::VecDeque;

/// Recordings ordered newest first.
///
/// New entries always go to the head and the list is never resorted. Nothing
/// is persisted; the list lives as long as the process.
#[derive(Debug, Default)]
pub struct RecordingList {
    entries: VecDeque<Recording>,
}

impl RecordingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `entry` and returns the index it landed at (always 0).
    pub fn insert_at_head(&mut self, entry: Recording) -> usize {
        self.entries.push_front(entry);
        0
    }

    pub fn get(&self, index: usize) -> Option<&Recording> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recording> {
        self.entries.iter()
    }
}
