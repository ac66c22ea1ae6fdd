//! Record/stop lifecycle on top of an audio capture backend.

use super::entry::Recording;
use super::error::RecorderError;
use super::permission::MicrophoneAccess;
use super::store::RecordingList;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Microphone-to-file encoder the controller drives.
///
/// A backend holds at most one capture at a time. `finish` and `discard` must
/// both leave it with no capture held, whatever their outcome.
pub trait CaptureBackend {
    /// File extension of the container this backend writes.
    fn extension(&self) -> &str;

    /// Engages the microphone and starts capturing for `output`.
    fn begin(&mut self, output: &Path) -> anyhow::Result<()>;

    /// Stops capturing and writes the encoded file.
    fn finish(&mut self) -> anyhow::Result<()>;

    /// Stops capturing and throws the audio away.
    fn discard(&mut self);
}

/// What a call to [`CaptureController::start`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Capture began, writing to this path.
    Started(PathBuf),
    /// A capture was already running; nothing changed.
    AlreadyCapturing,
    /// Microphone access is missing and has been requested.
    PermissionRequested,
}

#[derive(Debug)]
enum CaptureState {
    Idle,
    Capturing { path: PathBuf, started: Instant },
}

/// Owns the capture handle and the Idle/Capturing state machine.
pub struct CaptureController<B: CaptureBackend> {
    backend: B,
    cache_dir: PathBuf,
    state: CaptureState,
    last_stamp: i64,
}

impl<B: CaptureBackend> CaptureController<B> {
    /// Creates an idle controller writing recordings into `cache_dir`.
    pub fn new(backend: B, cache_dir: PathBuf) -> Self {
        Self {
            backend,
            cache_dir,
            state: CaptureState::Idle,
            last_stamp: 0,
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, CaptureState::Capturing { .. })
    }

    /// Starts a capture if access is granted and none is running.
    ///
    /// # Errors
    /// - [`RecorderError::CaptureStart`] if the backend fails; the controller stays idle
    pub fn start(&mut self, access: &mut MicrophoneAccess) -> Result<StartOutcome, RecorderError> {
        if self.is_capturing() {
            tracing::debug!("Start ignored: already capturing");
            return Ok(StartOutcome::AlreadyCapturing);
        }

        if !access.is_granted() {
            access.request();
            return Ok(StartOutcome::PermissionRequested);
        }

        let path = self.next_output_path();
        if let Err(e) = self.backend.begin(&path) {
            tracing::error!("Capture start failed: {:#}", e);
            self.backend.discard();
            return Err(RecorderError::CaptureStart(e));
        }

        tracing::info!("Capture started: {}", path.display());
        self.state = CaptureState::Capturing {
            path: path.clone(),
            started: Instant::now(),
        };
        Ok(StartOutcome::Started(path))
    }

    /// Stops the running capture and prepends its entry to `list`.
    ///
    /// Returns the index the new entry was inserted at, or `None` if nothing
    /// was being captured.
    ///
    /// # Errors
    /// - [`RecorderError::CaptureStop`] if the file could not be finalized. The
    ///   controller is idle afterwards and no entry is added.
    pub fn stop(&mut self, list: &mut RecordingList) -> Result<Option<usize>, RecorderError> {
        let (path, started) = match std::mem::replace(&mut self.state, CaptureState::Idle) {
            CaptureState::Idle => {
                tracing::debug!("Stop ignored: not capturing");
                return Ok(None);
            }
            CaptureState::Capturing { path, started } => (path, started),
        };

        let elapsed = started.elapsed();
        let stopped_at = Local::now();

        if let Err(e) = self.backend.finish() {
            tracing::error!(
                "Capture stop failed, partial file left at {}: {:#}",
                path.display(),
                e
            );
            self.backend.discard();
            return Err(RecorderError::CaptureStop(e));
        }

        let entry = Recording::new(path, elapsed, stopped_at);
        tracing::info!(
            "Capture stopped: {} ({}) at {}",
            entry.name(),
            entry.duration(),
            entry.timestamp().to_rfc3339()
        );
        Ok(Some(list.insert_at_head(entry)))
    }

    /// Drops any running capture without producing an entry.
    pub fn release(&mut self) {
        if let CaptureState::Capturing { path, .. } =
            std::mem::replace(&mut self.state, CaptureState::Idle)
        {
            tracing::info!("Capture released without saving: {}", path.display());
            self.backend.discard();
        }
    }

    /// Builds `{cache_dir}/recording_{epoch_millis}.{ext}` with a stamp that
    /// strictly increases across calls.
    fn next_output_path(&mut self) -> PathBuf {
        let stamp = Local::now().timestamp_millis().max(self.last_stamp + 1);
        self.last_stamp = stamp;
        self.cache_dir
            .join(format!("recording_{stamp}.{}", self.backend.extension()))
    }
}

impl<B: CaptureBackend> Drop for CaptureController<B> {
    fn drop(&mut self) {
        self.release();
    }
}
