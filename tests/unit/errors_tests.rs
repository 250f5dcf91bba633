/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use subwhisper::errors::{AppError, PipelineError, ProviderError, TranscodeError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 413,
        message: "Maximum content size limit exceeded".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("413"));
    assert!(display.contains("Maximum content size"));
}

#[test]
fn test_providerError_isRetryable_shouldOnlyRetryTransientFailures() {
    assert!(ProviderError::ConnectionError("reset".into()).is_retryable());
    assert!(ProviderError::Timeout("slow".into()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("429".into()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: String::new() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: String::new() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("bad key".into()).is_retryable());
    assert!(!ProviderError::ParseError("eof".into()).is_retryable());
}

#[test]
fn test_pipelineError_fromTranscodeError_shouldKeepDetails() {
    let error: PipelineError = TranscodeError::Failed {
        status: "exit status: 1".to_string(),
        stderr: "moov atom not found".to_string(),
    }
    .into();

    assert!(matches!(error, PipelineError::Transcode(_)));
    assert!(error.to_string().contains("moov atom not found"));
}

#[test]
fn test_pipelineError_write_shouldNamePath() {
    let error = PipelineError::Write {
        path: PathBuf::from("/videos/a.vtt"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    let display = error.to_string();
    assert!(display.contains("/videos/a.vtt"));
    assert!(display.contains("denied"));
}

#[test]
fn test_appError_exitCodes_shouldBeDistinctAndNonZero() {
    let errors = [
        AppError::Usage("bad flag".into()),
        AppError::DirectoryNotFound(PathBuf::from("/nope")),
        AppError::NotADirectory(PathBuf::from("/etc/hostname")),
        AppError::MissingCredential("OPENAI_API_KEY".into()),
        AppError::Config("bad json".into()),
        AppError::Unknown("boom".into()),
    ];

    let mut codes: Vec<u8> = errors.iter().map(AppError::exit_code).collect();
    assert!(codes.iter().all(|&c| c != 0));
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());

    assert_eq!(AppError::Usage(String::new()).exit_code(), 2);
    assert_eq!(AppError::DirectoryNotFound(PathBuf::new()).exit_code(), 3);
    assert_eq!(AppError::NotADirectory(PathBuf::new()).exit_code(), 4);
    assert_eq!(AppError::MissingCredential(String::new()).exit_code(), 5);
}

#[test]
fn test_appError_missingCredential_shouldNameVariable() {
    let error = AppError::MissingCredential("OPENAI_API_KEY".to_string());
    assert_eq!(error.to_string(), "OPENAI_API_KEY environment variable is required");
}

#[test]
fn test_appError_fromAnyhow_shouldKeepContextChain() {
    let error: AppError = anyhow::anyhow!("root cause").context("outer").into();
    let display = error.to_string();
    assert!(display.contains("outer"));
    assert!(display.contains("root cause"));
    assert_eq!(error.exit_code(), 1);
}
