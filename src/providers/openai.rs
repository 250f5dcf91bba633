use async_trait::async_trait;
use bytes::BytesMut;
use futures::TryStreamExt;
use log::{debug, error, warn};
use rand::Rng;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::app_config::TranscriptionConfig;
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::TranscriptionProvider;
use crate::subtitle_processor::{Segment, TranscriptionResult};

/// OpenAI client for the audio transcription endpoint
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. https://api.openai.com/v1
    endpoint: String,
    /// Transcription model
    model: String,
    /// ISO 639-1 language hint
    language: Option<String>,
    /// Optional prompt passed through to the model
    prompt: Option<String>,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Verbose JSON transcription response
#[derive(Debug, Deserialize)]
pub struct VerboseTranscription {
    /// Full transcript text
    pub text: String,
    /// Detected language name
    #[serde(default)]
    pub language: Option<String>,
    /// Audio duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Timed segments; extra per-segment fields are ignored
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl From<VerboseTranscription> for TranscriptionResult {
    fn from(response: VerboseTranscription) -> Self {
        TranscriptionResult {
            text: response.text,
            segments: response.segments,
            language: response.language,
            duration: response.duration,
        }
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::with_timeout(api_key, endpoint, Duration::from_secs(300))
    }

    fn with_timeout(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: "whisper-1".to_string(),
            language: None,
            prompt: None,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Create a client from the transcription configuration
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        let language = config.language.as_deref().and_then(|code| {
            match language_utils::normalize_to_part1(code) {
                Ok(part1) => Some(part1),
                Err(e) => {
                    warn!("Ignoring language hint: {}", e);
                    None
                }
            }
        });

        let mut client = Self::with_timeout(
            config.api_key.clone(),
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .model(config.model.clone())
        .retries(config.retry_count, config.retry_backoff_ms);
        client.language = language;
        client.prompt = config.prompt.clone();
        client
    }

    /// Set the transcription model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the retry policy
    pub fn retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Full URL of the transcription endpoint
    pub fn transcriptions_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/audio/transcriptions".to_string()
        } else {
            format!("{}/audio/transcriptions", self.endpoint.trim_end_matches('/'))
        }
    }

    /// Map an unsuccessful HTTP status to a provider error
    pub fn error_for_status(status: StatusCode, message: String) -> ProviderError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    /// Parse a verbose JSON response body
    pub fn parse_response(body: &str) -> Result<TranscriptionResult, ProviderError> {
        serde_json::from_str::<VerboseTranscription>(body)
            .map(TranscriptionResult::from)
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    // Streams the file from disk; a fresh stream is opened for every attempt
    async fn build_form(&self, audio_path: &Path) -> Result<Form, ProviderError> {
        let file = tokio::fs::File::open(audio_path).await.map_err(|e| {
            ProviderError::RequestFailed(format!("Failed to open audio file {}: {}", audio_path.display(), e))
        })?;
        let length = file.metadata().await.map(|m| m.len()).ok();

        let stream = FramedRead::new(file, BytesCodec::new()).map_ok(BytesMut::freeze);
        let body = Body::wrap_stream(stream);
        let part = match length {
            Some(length) => Part::stream_with_length(body, length),
            None => Part::stream(body),
        };

        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.mp3".to_string());
        let part = part
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment");

        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }
        if let Some(prompt) = &self.prompt {
            form = form.text("prompt", prompt.clone());
        }

        Ok(form)
    }

    async fn send_once(&self, url: &str, audio_path: &Path) -> Result<TranscriptionResult, ProviderError> {
        let form = self.build_form(audio_path).await?;

        let response = self.client.post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(Self::error_for_status(status, error_text));
        }

        let body = response.text().await.map_err(classify_request_error)?;
        Self::parse_response(&body)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
        let jitter = if self.backoff_base_ms >= 4 {
            rand::rng().random_range(0..self.backoff_base_ms / 4)
        } else {
            0
        };
        Duration::from_millis(base.saturating_add(jitter))
    }
}

fn classify_request_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else if e.is_connect() || e.is_request() || e.is_body() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAI {
    fn name(&self) -> &str {
        "OpenAI"
    }

    /// Transcribe with retry logic
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, ProviderError> {
        let url = self.transcriptions_url();
        let mut attempt = 0;

        loop {
            match self.send_once(&url, audio_path).await {
                Ok(result) => {
                    debug!(
                        "Received {} segments (language: {}, duration: {:?})",
                        result.segments.len(),
                        result.language.as_deref().unwrap_or("unknown"),
                        result.duration
                    );
                    return Ok(result);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff = self.backoff(attempt);
                    warn!(
                        "Transcription attempt {}/{} failed: {} - retrying in {}ms",
                        attempt,
                        self.max_retries + 1,
                        e,
                        backoff.as_millis()
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
