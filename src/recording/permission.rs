//! Microphone access consent.
//!
//! A terminal has no OS permission dialog, so access is modelled as a gate the
//! screen asks the user about. A request only marks the gate as pending; the
//! answer comes back later as a separate event.

/// Tracks whether the user has allowed microphone capture for this session.
#[derive(Debug, Clone, Default)]
pub struct MicrophoneAccess {
    granted: bool,
    pending: bool,
}

impl MicrophoneAccess {
    /// Access that must be confirmed by the user before the first capture.
    pub fn ask() -> Self {
        Self::default()
    }

    /// Access that was already granted, e.g. by configuration.
    pub fn granted() -> Self {
        Self {
            granted: true,
            pending: false,
        }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Whether a request is waiting for an answer.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Asks for access. Repeated requests while one is pending are folded into it.
    pub fn request(&mut self) {
        if !self.pending {
            tracing::debug!("Microphone access requested");
        }
        self.pending = true;
    }

    /// Records the user's answer. A denial can be asked again later.
    pub fn resolve(&mut self, granted: bool) {
        self.pending = false;
        self.granted = granted;
        tracing::info!(
            "Microphone access {}",
            if granted { "granted" } else { "denied" }
        );
    }
}
