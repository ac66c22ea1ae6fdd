//! List available audio input devices.

use crate::recording::audio::with_alsa_quiet;
use anyhow::anyhow;
use cpal::traits::{DeviceTrait, HostTrait};

/// Prints every input device cpal can see, with its index and default config.
///
/// The index or the name can be used as `audio.device` in taper.toml.
///
/// # Errors
/// - If the audio host cannot enumerate devices
pub fn handle_list_devices() -> Result<(), anyhow::Error> {
    let (default_name, devices) = with_alsa_quiet(|| {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());
        let devices: Vec<cpal::Device> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate audio devices: {e}"))?
            .filter(|d| d.name().is_ok())
            .collect();
        Ok((default_name, devices))
    })?;

    if devices.is_empty() {
        println!("No audio input devices found on this system.");
        return Ok(());
    }

    println!();
    println!("Available audio input devices:");
    println!();

    for (index, device) in devices.iter().enumerate() {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let marker = if default_name.as_deref() == Some(name.as_str()) {
            " [DEFAULT]"
        } else {
            ""
        };
        let config = device
            .default_input_config()
            .map(|c| format!("{}Hz, {} channels", c.sample_rate().0, c.channels()))
            .unwrap_or_else(|_| "configuration unavailable".to_string());

        println!("  {index}: {name}{marker}");
        println!("     {config}");
    }
    println!();

    Ok(())
}
