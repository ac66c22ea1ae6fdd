//! Event-driven wiring between the recorder screen and the controllers.
//!
//! The screen turns key presses into [`ScreenEvent`]s and reads back the
//! status text, trigger enablement, list changes and notices. Every controller
//! error ends here as a notice; nothing propagates to the host.

use crate::recording::{
    CaptureBackend, CaptureController, MicrophoneAccess, PlaybackBackend, PlaybackController,
    RecorderError, Recording, RecordingList,
};
use std::collections::VecDeque;

pub const STATUS_IDLE: &str = "Ready to record";
pub const STATUS_CAPTURING: &str = "Recording...";

/// User or system actions the screen forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    Record,
    Stop,
    /// Play the recording shown at this row.
    Play(usize),
    /// Answer to a pending microphone access request.
    PermissionResult(bool),
    /// The screen is going away; release every audio handle.
    Teardown,
}

/// How the recordings list changed while handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Unchanged,
    InsertedAt(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub struct ScreenController<C: CaptureBackend, P: PlaybackBackend> {
    capture: CaptureController<C>,
    playback: PlaybackController<P>,
    recordings: RecordingList,
    access: MicrophoneAccess,
    notices: VecDeque<Notice>,
}

impl<C: CaptureBackend, P: PlaybackBackend> ScreenController<C, P> {
    pub fn new(
        capture: CaptureController<C>,
        playback: PlaybackController<P>,
        access: MicrophoneAccess,
    ) -> Self {
        Self {
            capture,
            playback,
            recordings: RecordingList::new(),
            access,
            notices: VecDeque::new(),
        }
    }

    pub fn handle(&mut self, event: ScreenEvent) -> ListChange {
        tracing::debug!("Screen event: {:?}", event);
        match event {
            ScreenEvent::Record => {
                self.start_capture();
                ListChange::Unchanged
            }
            ScreenEvent::Stop => match self.capture.stop(&mut self.recordings) {
                Ok(Some(index)) => ListChange::InsertedAt(index),
                Ok(None) => ListChange::Unchanged,
                Err(e) => {
                    self.report(e);
                    ListChange::Unchanged
                }
            },
            ScreenEvent::Play(index) => {
                self.play(index);
                ListChange::Unchanged
            }
            ScreenEvent::PermissionResult(granted) => {
                if !self.access.is_pending() {
                    tracing::debug!("Ignoring permission result with no request pending");
                    return ListChange::Unchanged;
                }
                self.access.resolve(granted);
                if granted {
                    self.start_capture();
                } else {
                    self.report(RecorderError::PermissionDenied);
                }
                ListChange::Unchanged
            }
            ScreenEvent::Teardown => {
                self.capture.release();
                self.playback.release();
                ListChange::Unchanged
            }
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_capturing()
    }

    pub fn status(&self) -> &'static str {
        if self.is_capturing() {
            STATUS_CAPTURING
        } else {
            STATUS_IDLE
        }
    }

    pub fn record_enabled(&self) -> bool {
        !self.is_capturing()
    }

    pub fn stop_enabled(&self) -> bool {
        self.is_capturing()
    }

    /// Whether the screen should be asking the user for microphone access.
    pub fn permission_pending(&self) -> bool {
        self.access.is_pending()
    }

    pub fn recordings(&self) -> &RecordingList {
        &self.recordings
    }

    /// Drains the notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn start_capture(&mut self) {
        if let Err(e) = self.capture.start(&mut self.access) {
            self.report(e);
        }
    }

    fn play(&mut self, index: usize) {
        let Some(entry) = self.recordings.get(index).cloned() else {
            tracing::debug!("No recording at row {}", index);
            return;
        };

        match self.playback.play(&entry) {
            Ok(()) => self.notify(NoticeLevel::Info, playing_message(&entry)),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: RecorderError) {
        tracing::warn!("{}", error);
        self.notify(NoticeLevel::Error, error.notice().to_string());
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        self.notices.push_back(Notice { level, message });
    }
}

fn playing_message(entry: &Recording) -> String {
    format!("Playing: {}", entry.name())
}
