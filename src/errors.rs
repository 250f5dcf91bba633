/*!
 * Error types for the subwhisper application.
 *
 * Per-file failures are described by `PipelineError` and never escape the
 * file orchestrator. Startup failures are described by `AppError`, which
 * carries the process exit code.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the transcription service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when building or sending a request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Whether another attempt of the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) | Self::Timeout(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::RequestFailed(_) | Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors raised by the external audio transcoder
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The transcoder process could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The transcoder ran but exited unsuccessfully
    #[error("Transcoder exited with {status}: {stderr}")]
    Failed {
        status: String,
        stderr: String,
    },

    /// The transcoder did not finish in time
    #[error("Transcoder timed out after {secs} seconds")]
    TimedOut { secs: u64 },
}

/// Errors that can occur while processing a single media file
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad path, wrong extension or missing directory
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure converting the video into audio
    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),

    /// Network, authentication or remote failure
    #[error("Transcription service error: {0}")]
    TranscriptionService(#[from] ProviderError),

    /// Failure writing a subtitle file
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal startup errors; each maps to a distinct exit code
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid command line arguments
    #[error("{0}")]
    Usage(String),

    /// The target directory does not exist
    #[error("Folder not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The target path exists but is not a directory
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// No API key was supplied for the transcription service
    #[error("{0} environment variable is required")]
    MissingCredential(String),

    /// The configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Unknown(_) => 1,
            Self::Usage(_) => 2,
            Self::DirectoryNotFound(_) => 3,
            Self::NotADirectory(_) => 4,
            Self::MissingCredential(_) => 5,
            Self::Config(_) => 6,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<PipelineError> for AppError {
    fn from(error: PipelineError) -> Self {
        Self::Unknown(error.to_string())
    }
}
