//! Microphone capture through cpal.
//!
//! Samples are pulled from the configured input device at its native rate,
//! down-mixed to mono and buffered in memory. When a capture finishes they are
//! written as WAV with hound and encoded to the configured output format.

use super::capture::CaptureBackend;
use super::encoder::OutputFormat;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::WavWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Captures from a named or default input device into an encoded file.
pub struct CpalCapture {
    /// "default", a device index, or a device name
    device_name: String,
    requested_sample_rate: u32,
    format: OutputFormat,
    active: Option<ActiveCapture>,
}

/// A running input stream and the samples it has produced so far.
struct ActiveCapture {
    /// Kept alive for the duration of the capture; dropping it stops the device
    stream: cpal::Stream,
    samples: Arc<Mutex<Vec<i16>>>,
    sample_rate: u32,
    output: PathBuf,
}

impl CpalCapture {
    pub fn new(device_name: String, requested_sample_rate: u32, format: OutputFormat) -> Self {
        Self {
            device_name,
            requested_sample_rate,
            format,
            active: None,
        }
    }

    fn open_stream(&self, samples: &Arc<Mutex<Vec<i16>>>) -> Result<(cpal::Stream, u32)> {
        let device = with_alsa_quiet(|| {
            let host = cpal::default_host();
            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_input_device(&host, &self.device_name)
            }
        })?;

        tracing::info!(
            "Recording device: {}",
            device.name().unwrap_or_else(|_| "Unknown device".to_string())
        );

        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        if sample_rate != self.requested_sample_rate {
            tracing::warn!(
                "Requested {}Hz but device uses {}Hz. Recording at device rate.",
                self.requested_sample_rate,
                sample_rate
            );
        }
        tracing::debug!("Device configuration: {}Hz, {} channels", sample_rate, channels);

        let config: cpal::StreamConfig = supported.config();
        let on_error = |err: cpal::StreamError| tracing::error!("Audio stream error: {}", err);

        let stream = match supported.sample_format() {
            cpal::SampleFormat::I16 => {
                let sink = Arc::clone(samples);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        push_mono(&sink, data.iter().copied(), channels);
                    },
                    on_error,
                    None,
                )?
            }
            cpal::SampleFormat::F32 => {
                let sink = Arc::clone(samples);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let converted = data
                            .iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16);
                        push_mono(&sink, converted, channels);
                    },
                    on_error,
                    None,
                )?
            }
            other => return Err(anyhow!("Unsupported input sample format: {other:?}")),
        };

        stream.play()?;
        Ok((stream, sample_rate))
    }
}

impl CaptureBackend for CpalCapture {
    fn extension(&self) -> &str {
        self.format.extension()
    }

    fn begin(&mut self, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let samples = Arc::new(Mutex::new(Vec::new()));
        let (stream, sample_rate) = self.open_stream(&samples)?;
        self.active = Some(ActiveCapture {
            stream,
            samples,
            sample_rate,
            output: output.to_path_buf(),
        });

        tracing::debug!("Audio stream started");
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let ActiveCapture {
            stream,
            samples,
            sample_rate,
            output,
        } = self
            .active
            .take()
            .ok_or_else(|| anyhow!("No capture in progress"))?;
        drop(stream);

        let samples = samples
            .lock()
            .map(|mut s| std::mem::take(&mut *s))
            .map_err(|_| anyhow!("Sample buffer poisoned"))?;

        if samples.is_empty() {
            tracing::warn!("Capture stopped with no samples");
        }
        tracing::info!(
            "Captured {:.2}s ({} samples at {}Hz)",
            samples.len() as f32 / sample_rate as f32,
            samples.len(),
            sample_rate
        );

        if self.format.is_passthrough() {
            return write_wav(&samples, sample_rate, &output);
        }

        let temp_wav = std::env::temp_dir().join(format!("taper_{}.wav", std::process::id()));
        encode_samples(&self.format, &samples, sample_rate, &temp_wav, &output)?;

        let size = std::fs::metadata(&output)?.len();
        tracing::info!("Audio saved: {} ({} bytes)", output.display(), size);
        Ok(())
    }

    fn discard(&mut self) {
        if let Some(active) = self.active.take() {
            drop(active.stream);
            tracing::debug!("Audio stream dropped, {} discarded", active.output.display());
        }
    }
}

/// Appends interleaved frames to `sink`, averaging channels down to mono.
fn push_mono(sink: &Mutex<Vec<i16>>, data: impl Iterator<Item = i16>, channels: usize) {
    let Ok(mut samples) = sink.lock() else {
        return;
    };

    if channels <= 1 {
        samples.extend(data);
        return;
    }

    let frame: Vec<i32> = data.map(i32::from).collect();
    samples.extend(
        frame
            .chunks_exact(channels)
            .map(|chunk| (chunk.iter().sum::<i32>() / channels as i32) as i16),
    );
}

fn write_wav(samples: &[i16], sample_rate: u32, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    tracing::debug!("WAV written: {}", path.display());
    Ok(())
}

/// Writes `samples` to `temp_wav` and encodes it into `output`.
///
/// The temporary WAV is removed whether or not writing or encoding succeeded.
fn encode_samples(
    format: &OutputFormat,
    samples: &[i16],
    sample_rate: u32,
    temp_wav: &Path,
    output: &Path,
) -> Result<()> {
    let result = write_wav(samples, sample_rate, temp_wav)
        .and_then(|()| format.encode(temp_wav, output));
    if let Err(e) = std::fs::remove_file(temp_wav) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!("Failed to remove temp file {}: {}", temp_wav.display(), e);
        }
    }
    result
}

/// Finds an input device by numeric index or exact name.
///
/// # Errors
/// - If no device matches
pub(crate) fn find_input_device(host: &cpal::Host, spec: &str) -> Result<cpal::Device> {
    let mut devices = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?;

    if let Ok(index) = spec.parse::<usize>() {
        return devices
            .nth(index)
            .ok_or_else(|| anyhow!("Device index {index} is out of range"));
    }

    devices
        .find(|d| d.name().map(|name| name == spec).unwrap_or(false))
        .ok_or_else(|| {
            anyhow!("Audio input device '{spec}' not found. Use 'taper list-devices' to see available devices.")
        })
}

/// Runs `f` with stderr pointed at /dev/null so ALSA's probing noise does not
/// land on the terminal.
#[cfg(target_os = "linux")]
pub(crate) fn with_alsa_quiet<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let saved = unsafe { libc::dup(libc::STDERR_FILENO) };
    if saved == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }
    if unsafe { libc::dup2(dev_null.as_raw_fd(), libc::STDERR_FILENO) } == -1 {
        unsafe { libc::close(saved) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(saved, libc::STDERR_FILENO);
        libc::close(saved);
    }
    result
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn with_alsa_quiet<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}
