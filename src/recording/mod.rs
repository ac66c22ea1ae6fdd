//! Recording feature for taper.
//!
//! Holds the recording entries and session list, the capture and playback
//! controllers, and the cpal/rodio backends they drive.

pub mod audio;
pub mod capture;
pub mod encoder;
pub mod entry;
pub mod error;
pub mod permission;
pub mod playback;
pub mod player;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use audio::CpalCapture;
pub use capture::{CaptureBackend, CaptureController, StartOutcome};
pub use encoder::OutputFormat;
pub use entry::Recording;
pub use error::RecorderError;
pub use permission::MicrophoneAccess;
pub use playback::{PlaybackBackend, PlaybackController};
pub use player::RodioPlayback;
pub use store::RecordingList;
