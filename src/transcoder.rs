use async_trait::async_trait;
use log::{debug, error};
use std::fmt::Debug;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::TranscoderConfig;
use crate::errors::TranscodeError;

// @module: Video to audio conversion

/// Converts a video container into a compressed audio file
#[async_trait]
pub trait Transcoder: Send + Sync + Debug {
    /// Write the audio track of `input` to `output`, replacing any existing file
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// Transcoder backed by the ffmpeg command line tool
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Arguments for a constant-bitrate MP3 conversion
    pub fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            self.config.audio_codec.clone(),
            "-b:a".to_string(),
            format!("{}k", self.config.audio_bitrate_kbps),
            "-f".to_string(),
            "mp3".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Filter ffmpeg stderr to only show meaningful error lines, stripping the
    /// version banner, build configuration, and stream metadata noise.
    pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let noise_prefixes = [
            "ffmpeg version",
            "built with",
            "configuration:",
            "lib",
            "Input #",
            "Metadata:",
            "Duration:",
            "Chapter",
            "Stream #",
            "major_brand",
            "minor_version",
            "compatible_brands",
            "creation_time",
            "handler_name",
            "vendor_id",
            "encoder",
            "Output #",
            "Stream mapping:",
            "Press [q]",
            "size=",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let args = self.build_args(input, output);
        debug!("Running {} {}", self.config.ffmpeg_path, args.join(" "));

        let ffmpeg_future = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|source| TranscodeError::Spawn {
                    program: self.config.ffmpeg_path.clone(),
                    source,
                })?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(TranscodeError::TimedOut { secs: self.config.timeout_secs });
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("Audio conversion failed: {}", filtered);
            return Err(TranscodeError::Failed {
                status: result.status.to_string(),
                stderr: filtered,
            });
        }

        Ok(())
    }
}
