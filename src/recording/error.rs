//! Failures raised by the capture and playback controllers.
//!
//! None of these are fatal. The screen controller logs them and turns each
//! one into a short notice for the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    /// The user refused microphone access.
    #[error("microphone access denied")]
    PermissionDenied,

    /// The capture device or encoder could not be started.
    #[error("failed to start capture: {0:#}")]
    CaptureStart(anyhow::Error),

    /// The capture could not be finalized into an audio file.
    #[error("failed to finalize capture: {0:#}")]
    CaptureStop(anyhow::Error),

    /// The file is missing or undecodable, or the output device is busy.
    #[error("failed to play recording: {0:#}")]
    Playback(anyhow::Error),
}

impl RecorderError {
    /// Short text shown to the user in place of the full error chain.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Microphone permission required",
            Self::CaptureStart(_) => "Recording failed to start",
            Self::CaptureStop(_) => "Recording failed to stop",
            Self::Playback(_) => "Playback failed",
        }
    }
}
