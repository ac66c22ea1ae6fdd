//! Playback through rodio.
//!
//! The output stream is opened on first use and kept for the rest of the
//! session. Each played recording gets its own `Sink`.

use super::playback::PlaybackBackend;
use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Default)]
pub struct RodioPlayback {
    stream: Option<OutputStream>,
}

impl RodioPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream(&mut self) -> Result<&OutputStream> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .context("No audio output device")?;
            // rodio reports its own drop on stderr, which would land on the TUI.
            stream.log_on_drop(false);
            tracing::debug!("Audio output stream opened");
            self.stream = Some(stream);
        }
        self.stream.as_ref().context("No audio output device")
    }
}

/// One recording being played. Dropping it silences the sink.
pub struct RodioSession {
    sink: Sink,
}

impl Drop for RodioSession {
    fn drop(&mut self) {
        self.sink.stop();
    }
}

impl PlaybackBackend for RodioPlayback {
    type Session = RodioSession;

    fn open(&mut self, path: &Path) -> Result<RodioSession> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to decode {}", path.display()))?;

        let sink = Sink::connect_new(self.stream()?.mixer());
        sink.append(source);
        sink.play();
        Ok(RodioSession { sink })
    }
}
