//! Media file probing to get metadata without any in-process decode.
//!
//! Spawns the external `ffprobe` binary and parses its JSON output. The
//! parse step is separate from the spawn so it can be tested against
//! canned output.

use std::path::Path;
use std::process::Command;

use ffmpeg_sidecar::ffprobe::ffprobe_path;
use quickcut_core::{QuickCutError, Result, Seconds};
use quickcut_engine::Source;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Information about a probed media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Container duration
    pub duration: Seconds,
    /// Video streams
    pub video_streams: Vec<VideoStreamInfo>,
    /// Audio streams
    pub audio_streams: Vec<AudioStreamInfo>,
    /// Container format
    pub format: String,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second
    pub frame_rate: f64,
    pub bit_rate: Option<u64>,
}

/// Information about an audio stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_rate: Option<u64>,
}

// ── Raw ffprobe JSON shapes (only the fields we read) ────────────

#[derive(Debug, Deserialize)]
struct RawProbe {
    format: RawFormat,
    #[serde(default)]
    streams: Vec<RawStream>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    format_name: String,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
    bit_rate: Option<String>,
}

impl MediaProbe {
    /// Probe a media file with ffprobe.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(QuickCutError::NotFound(format!(
                "file not found: {}",
                path.display()
            )));
        }
        let path_str = path.to_string_lossy().to_string();

        let output = Command::new(ffprobe_path())
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| QuickCutError::Probe(format!("failed to spawn ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(QuickCutError::Probe(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let probe = Self::from_json(&path_str, &json)?;
        info!(path = %path_str, duration = %probe.duration, "probed media file");
        Ok(probe)
    }

    /// Parse ffprobe JSON output into a probe result.
    pub fn from_json(path: &str, json: &str) -> Result<Self> {
        let raw: RawProbe = serde_json::from_str(json)
            .map_err(|e| QuickCutError::Probe(format!("unreadable ffprobe output: {e}")))?;

        let duration_secs: f64 = raw
            .format
            .duration
            .as_deref()
            .unwrap_or("0")
            .parse()
            .map_err(|_| QuickCutError::Probe("non-numeric container duration".into()))?;

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        for stream in raw.streams {
            match stream.codec_type.as_deref() {
                Some("video") => video_streams.push(VideoStreamInfo {
                    index: stream.index,
                    codec: stream.codec_name.unwrap_or_default(),
                    width: stream.width.unwrap_or(0),
                    height: stream.height.unwrap_or(0),
                    frame_rate: stream
                        .r_frame_rate
                        .as_deref()
                        .and_then(parse_ratio)
                        .unwrap_or(0.0),
                    bit_rate: stream.bit_rate.as_deref().and_then(|b| b.parse().ok()),
                }),
                Some("audio") => audio_streams.push(AudioStreamInfo {
                    index: stream.index,
                    codec: stream.codec_name.unwrap_or_default(),
                    sample_rate: stream
                        .sample_rate
                        .as_deref()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0),
                    channels: stream.channels.unwrap_or(0),
                    bit_rate: stream.bit_rate.as_deref().and_then(|b| b.parse().ok()),
                }),
                _ => {}
            }
        }

        Ok(Self {
            path: path.to_string(),
            duration: Seconds::from_f64(duration_secs),
            video_streams,
            audio_streams,
            format: raw.format.format_name,
        })
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// Check if the file has audio.
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// Get the primary video stream info.
    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    /// Get the primary audio stream info.
    pub fn primary_audio(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams.first()
    }

    /// Produce a catalog entry for this file.
    pub fn to_source(&self) -> Source {
        let name = Path::new(&self.path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone());
        Source::new(
            self.path.clone(),
            name,
            self.duration,
            self.has_video(),
            self.has_audio(),
        )
    }
}

/// Parse an ffprobe ratio like `30000/1001` or a plain number.
fn parse_ratio(s: &str) -> Option<f64> {
    match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => s.parse().ok(),
    }
}
