//! Output format handling and ffmpeg-based encoding.
//!
//! Captures are written as 16-bit mono WAV first and then handed to ffmpeg to
//! produce the configured compressed format. The ffmpeg binary is looked up in
//! the usual install locations before falling back to a PATH search, so it is
//! found even when launched from a restricted environment.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Codec that needs no ffmpeg pass: the WAV is the final file.
const PASSTHROUGH_CODEC: &str = "pcm_s16le";

/// Codecs ffmpeg can write that playback can also decode, with their container.
const SUPPORTED_CODECS: &[(&str, &str)] = &[
    ("mp3", "mp3"),
    ("aac", "m4a"),
    ("libvorbis", "ogg"),
    ("flac", "flac"),
    (PASSTHROUGH_CODEC, "wav"),
];

/// Parsed `output_format` setting: `"codec [ffmpeg options]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    codec: String,
    extension: &'static str,
    options: Vec<String>,
}

impl OutputFormat {
    /// Parses a format string such as `"mp3 -ab 64k"`.
    ///
    /// # Errors
    /// - If the string has no codec
    /// - If the codec is not one recordings can be played back from
    pub fn parse(format: &str) -> Result<Self> {
        let mut parts = format.split_whitespace();
        let codec = parts
            .next()
            .ok_or_else(|| anyhow!("Invalid output format: empty"))?;
        let extension = SUPPORTED_CODECS
            .iter()
            .find(|(name, _)| *name == codec)
            .map(|(_, extension)| *extension)
            .ok_or_else(|| {
                let supported: Vec<&str> = SUPPORTED_CODECS.iter().map(|(name, _)| *name).collect();
                anyhow!(
                    "Unsupported codec '{codec}'. Use one of: {}",
                    supported.join(", ")
                )
            })?;
        Ok(Self {
            codec: codec.to_string(),
            extension,
            options: parts.map(str::to_string).collect(),
        })
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    /// Container extension the codec is stored in.
    pub fn extension(&self) -> &str {
        self.extension
    }

    /// Whether the intermediate WAV already is the final file.
    pub fn is_passthrough(&self) -> bool {
        self.codec == PASSTHROUGH_CODEC
    }

    /// Encodes `input_wav` into `output` with ffmpeg. Output is always mono.
    ///
    /// # Errors
    /// - If ffmpeg cannot be found or started
    /// - If ffmpeg exits with a failure status
    pub fn encode(&self, input_wav: &Path, output: &Path) -> Result<()> {
        let ffmpeg = find_ffmpeg()?;

        let result = Command::new(&ffmpeg)
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(input_wav)
            .arg("-acodec")
            .arg(&self.codec)
            .arg("-ac")
            .arg("1")
            .arg("-y")
            .args(&self.options)
            .arg(output)
            .output()
            .with_context(|| format!("Failed to run {}", ffmpeg.display()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(anyhow!("ffmpeg failed to encode {}: {}", self.codec, stderr.trim()));
        }

        tracing::debug!("Encoded {} to {}", input_wav.display(), output.display());
        Ok(())
    }
}

/// Locates the ffmpeg binary.
///
/// # Errors
/// - If ffmpeg is neither in a known location nor on PATH
pub fn find_ffmpeg() -> Result<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/opt/homebrew/bin/ffmpeg",
            "/usr/local/bin/ffmpeg",
            "/usr/bin/ffmpeg",
        ]
    } else if cfg!(target_os = "linux") {
        &["/usr/bin/ffmpeg", "/usr/local/bin/ffmpeg", "/snap/bin/ffmpeg"]
    } else if cfg!(target_os = "windows") {
        &[
            "C:\\ffmpeg\\bin\\ffmpeg.exe",
            "C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe",
        ]
    } else {
        &[]
    };

    if let Some(path) = candidates.iter().map(PathBuf::from).find(|p| p.exists()) {
        tracing::debug!("Found ffmpeg at: {}", path.display());
        return Ok(path);
    }

    let search = if cfg!(target_os = "windows") { "where" } else { "which" };
    let output = Command::new(search)
        .arg("ffmpeg")
        .output()
        .map_err(|e| anyhow!("Failed to search PATH for ffmpeg: {e}"))?;

    let found = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(found.lines().next().unwrap_or("").trim());
    if output.status.success() && !path.as_os_str().is_empty() {
        tracing::debug!("Found ffmpeg in PATH at: {}", path.display());
        return Ok(path);
    }

    Err(anyhow!(
        "ffmpeg not found. Install it (brew install ffmpeg, apt install ffmpeg) \
         or set audio.output_format to \"pcm_s16le\" to record plain WAV."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codec_and_options() {
        let format = OutputFormat::parse("mp3 -ab 64k -ar 22050").unwrap();
        assert_eq!(format.codec(), "mp3");
        assert_eq!(format.options, vec!["-ab", "64k", "-ar", "22050"]);
        assert!(!format.is_passthrough());
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(OutputFormat::parse("   ").is_err());
    }

    #[test]
    fn test_extension_mapping() {
        let ext = |f: &str| OutputFormat::parse(f).unwrap().extension().to_string();
        assert_eq!(ext("aac -b:a 64k"), "m4a");
        assert_eq!(ext("libvorbis"), "ogg");
        assert_eq!(ext("flac"), "flac");
        assert_eq!(ext("pcm_s16le"), "wav");
        assert_eq!(ext("mp3"), "mp3");
    }

    #[test]
    fn test_unplayable_codecs_rejected() {
        for codec in ["libopus", "libmp3lame", "libfdk_aac", "pcm_s24le", "opus -b:a 32k"] {
            let err = OutputFormat::parse(codec).unwrap_err().to_string();
            assert!(err.contains("Unsupported codec"), "{codec}: {err}");
            assert!(err.contains("libvorbis"), "{codec}: {err}");
        }
    }
}
