//! Interactive recorder: capture, list and play back clips.

use crate::config::TaperConfig;
use crate::recording::{
    CaptureController, CpalCapture, MicrophoneAccess, OutputFormat, PlaybackController,
    RodioPlayback,
};
use crate::screen::{RecorderScreen, ScreenController};
use crate::ui::report_fatal;

/// Opens the recorder screen with the user's configuration.
///
/// # Errors
/// - If the configuration cannot be loaded or is invalid
/// - If the terminal cannot be taken over
pub fn handle_record() -> Result<(), anyhow::Error> {
    tracing::info!("=== taper recorder started ===");

    let config = match TaperConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err:#}");
            report_fatal(
                "Configuration Error",
                &format!("{err:#}\n\nCheck ~/.config/taper/taper.toml or run 'taper config'."),
            );
            return Err(err.context("Configuration error"));
        }
    };

    let format = match OutputFormat::parse(&config.audio.output_format) {
        Ok(format) => format,
        Err(err) => {
            tracing::error!("Invalid output format: {err:#}");
            report_fatal("Configuration Error", &format!("audio.output_format: {err}"));
            return Err(err);
        }
    };
    let cache_dir = config.storage.resolve_cache_dir()?;

    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, format={}, cache_dir={}",
        config.audio.device,
        config.audio.sample_rate,
        config.audio.output_format,
        cache_dir.display()
    );

    let access = if config.audio.confirm_microphone_access {
        MicrophoneAccess::ask()
    } else {
        MicrophoneAccess::granted()
    };

    let capture = CaptureController::new(
        CpalCapture::new(config.audio.device.clone(), config.audio.sample_rate, format),
        cache_dir,
    );
    let playback = PlaybackController::new(RodioPlayback::new());
    let controller = ScreenController::new(capture, playback, access);

    let mut screen = RecorderScreen::new(controller)?;
    screen.run()?;

    tracing::info!("=== taper recorder exited ===");
    Ok(())
}
