//! Single-slot playback of recordings.

use super::entry::Recording;
use super::error::RecorderError;
use std::path::Path;

/// Audio decoder and output device the controller drives.
///
/// A session plays from the moment it is opened. Dropping it stops playback
/// and releases the output.
pub trait PlaybackBackend {
    type Session;

    fn open(&mut self, path: &Path) -> anyhow::Result<Self::Session>;
}

/// Holds at most one playback session. A new `play` always preempts the old one.
pub struct PlaybackController<B: PlaybackBackend> {
    backend: B,
    current: Option<B::Session>,
}

impl<B: PlaybackBackend> PlaybackController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// Whether a session is currently held.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Plays `entry`, releasing any previous session first.
    ///
    /// # Errors
    /// - [`RecorderError::Playback`] if the file cannot be opened or decoded;
    ///   no session is held afterwards
    pub fn play(&mut self, entry: &Recording) -> Result<(), RecorderError> {
        self.release();

        match self.backend.open(entry.path()) {
            Ok(session) => {
                tracing::info!("Playing {} from {}", entry.name(), entry.path().display());
                self.current = Some(session);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Playback of {} failed: {:#}", entry.path().display(), e);
                Err(RecorderError::Playback(e))
            }
        }
    }

    /// Stops and drops the current session, if any.
    pub fn release(&mut self) {
        if self.current.take().is_some() {
            tracing::debug!("Playback session released");
        }
    }
}

impl<B: PlaybackBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::testing::FakePlayback;
    use chrono::Local;
    use std::path::PathBuf;
    use std::time::Duration;

    fn entry(path: &str) -> Recording {
        Recording::new(PathBuf::from(path), Duration::from_secs(3), Local::now())
    }

    #[test]
    fn test_second_play_preempts_first() {
        let backend = FakePlayback::new();
        let log = backend.log();
        let mut playback = PlaybackController::new(backend);

        playback.play(&entry("/first.mp3")).unwrap();
        playback.play(&entry("/second.mp3")).unwrap();

        assert_eq!(log.live(), vec![PathBuf::from("/second.mp3")]);
        assert_eq!(log.released(), vec![PathBuf::from("/first.mp3")]);
        assert!(playback.is_active());
    }

    #[test]
    fn test_failed_play_leaves_slot_empty() {
        let backend = FakePlayback::new();
        let log = backend.log();
        let mut playback = PlaybackController::new(backend);
        playback.play(&entry("/first.mp3")).unwrap();

        log.fail_path("/missing.mp3");
        let err = playback.play(&entry("/missing.mp3")).unwrap_err();

        assert!(matches!(err, RecorderError::Playback(_)));
        assert!(!playback.is_active());
        assert!(log.live().is_empty());
    }

    #[test]
    fn test_drop_releases_session() {
        let backend = FakePlayback::new();
        let log = backend.log();
        let mut playback = PlaybackController::new(backend);
        playback.play(&entry("/first.mp3")).unwrap();

        drop(playback);

        assert!(log.live().is_empty());
    }
}
