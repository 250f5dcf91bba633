use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::errors::AppError;

/// Application configuration module
/// This module handles loading, validating and overriding configuration
/// settings for the transcoder, the transcription service and the renderers.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Transcription service settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Audio transcoder settings
    #[serde(default)]
    pub transcoder: TranscoderConfig,

    /// Subtitle rendering settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcription service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    // @field: Service URL, without the /audio/transcriptions suffix
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key (usually supplied through OPENAI_API_KEY instead)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Spoken language hint (ISO 639-1 or 639-2); auto-detected when absent
    #[serde(default)]
    pub language: Option<String>,

    /// Optional prompt to steer spelling of names and jargon
    #[serde(default)]
    pub prompt: Option<String>,

    // @field: Timeout seconds for a single request
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
            language: None,
            prompt: None,
            timeout_secs: default_request_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Audio transcoder configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscoderConfig {
    /// Path or name of the ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Constant audio bitrate in kbps
    #[serde(default = "default_audio_bitrate_kbps")]
    pub audio_bitrate_kbps: u32,

    /// Audio encoder passed to ffmpeg
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Maximum duration of one conversion in seconds
    #[serde(default = "default_transcode_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            audio_bitrate_kbps: default_audio_bitrate_kbps(),
            audio_codec: default_audio_codec(),
            timeout_secs: default_transcode_timeout_secs(),
        }
    }
}

/// Configuration for subtitle rendering
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SubtitleConfig {
    /// WebVTT cue width in percent, emitted as ` size:<width>%`
    #[serde(default)]
    pub vtt_width: Option<u32>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the filter understood by the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Environment variable holding the transcription API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Command line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub vtt_width: Option<u32>,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "whisper-1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_audio_bitrate_kbps() -> u32 {
    128
}

fn default_audio_codec() -> String {
    "libmp3lame".to_string()
}

fn default_transcode_timeout_secs() -> u64 {
    600
}

impl Config {
    /// Default location of the configuration file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("subwhisper").join("config.json"))
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the explicitly requested file, else the default file if present, else defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Resolve the configuration for a folder run
    ///
    /// Checks run in a fixed order so the first problem reported is stable:
    /// folder exists, folder is a directory, config loads, API key present,
    /// config valid.
    pub fn prepare_run(directory: &Path, config_path: Option<&Path>, overrides: RunOverrides) -> Result<Self, AppError> {
        if !directory.exists() {
            return Err(AppError::DirectoryNotFound(directory.to_path_buf()));
        }
        if !directory.is_dir() {
            return Err(AppError::NotADirectory(directory.to_path_buf()));
        }

        let mut config = Self::load(config_path)
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        config.apply_overrides(overrides);

        if config.transcription.api_key.trim().is_empty() {
            return Err(AppError::MissingCredential(API_KEY_ENV.to_string()));
        }

        config.validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        Ok(config)
    }

    // @method: Override file values with command line values
    fn apply_overrides(&mut self, overrides: RunOverrides) {
        if let Some(api_key) = overrides.api_key {
            self.transcription.api_key = api_key;
        }
        if let Some(model) = overrides.model {
            self.transcription.model = model;
        }
        if let Some(language) = overrides.language {
            self.transcription.language = Some(language);
        }
        if let Some(width) = overrides.vtt_width {
            self.subtitles.vtt_width = Some(width);
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.transcription.endpoint)
            .with_context(|| format!("Invalid transcription endpoint: {}", self.transcription.endpoint))?;

        if self.transcription.model.trim().is_empty() {
            return Err(anyhow!("Transcription model must not be empty"));
        }

        if self.transcription.api_key.trim().is_empty() {
            return Err(anyhow!("Transcription API key is required"));
        }

        if let Some(language) = &self.transcription.language {
            crate::language_utils::normalize_to_part1(language)?;
        }

        if self.transcoder.audio_bitrate_kbps == 0 {
            return Err(anyhow!("Audio bitrate must be greater than zero"));
        }

        if let Some(width) = self.subtitles.vtt_width {
            if !(1..=100).contains(&width) {
                return Err(anyhow!("VTT width must be between 1 and 100, got {}", width));
            }
        }

        Ok(())
    }
}
