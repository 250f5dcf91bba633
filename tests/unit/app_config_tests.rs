/*!
 * Tests for application configuration
 */

use anyhow::Result;
use subwhisper::app_config::{Config, LogLevel, RunOverrides};
use subwhisper::errors::AppError;
use crate::common;

/// Test that a partial file falls back to defaults for every missing field
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{
            "transcription": { "model": "whisper-large", "language": "de" },
            "subtitles": { "vtt_width": 80 },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.transcription.model, "whisper-large");
    assert_eq!(config.transcription.language.as_deref(), Some("de"));
    assert_eq!(config.transcription.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.transcription.retry_count, 3);
    assert_eq!(config.transcoder.ffmpeg_path, "ffmpeg");
    assert_eq!(config.subtitles.vtt_width, Some(80));
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_from_file_withEmptyObject_shouldEqualDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", "{}")?;

    let config = Config::from_file(&path)?;
    let defaults = Config::default();
    assert_eq!(config.transcription.model, defaults.transcription.model);
    assert_eq!(config.transcoder.audio_bitrate_kbps, defaults.transcoder.audio_bitrate_kbps);
    assert_eq!(config.subtitles.vtt_width, None);
    Ok(())
}

#[test]
fn test_from_file_withMalformedJson_shouldNamePath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    let error = Config::from_file(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("broken.json"));
    Ok(())
}

#[test]
fn test_load_withExplicitMissingPath_shouldFail() {
    assert!(Config::load(Some(std::path::Path::new("/no/such/config.json"))).is_err());
}

#[test]
fn test_validate_withTestConfig_shouldPass() {
    assert!(common::test_config().validate().is_ok());
}

#[test]
fn test_validate_withBadEndpointOrLanguage_shouldFail() {
    let mut config = common::test_config();
    config.transcription.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = common::test_config();
    config.transcription.language = Some("klingon".to_string());
    assert!(config.validate().is_err());

    let mut config = common::test_config();
    config.transcription.model = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_log_level_toLevelFilter_shouldMatchName() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}

fn with_key(key: &str) -> RunOverrides {
    RunOverrides {
        api_key: Some(key.to_string()),
        ..RunOverrides::default()
    }
}

/// Test that a missing folder is reported before a missing key
#[test]
fn test_prepare_run_withMissingFolderAndNoKey_shouldReportFolder() {
    let result = Config::prepare_run(
        std::path::Path::new("./non_existent_directory_12345"),
        None,
        RunOverrides::default(),
    );

    match result {
        Err(e @ AppError::DirectoryNotFound(_)) => assert_eq!(e.exit_code(), 3),
        other => panic!("expected DirectoryNotFound, got {:?}", other),
    }
}

#[test]
fn test_prepare_run_withFileInsteadOfFolder_shouldReportNotADirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "clip.mp4", "video")?;

    match Config::prepare_run(&file, None, with_key("sk-test")) {
        Err(e @ AppError::NotADirectory(_)) => assert_eq!(e.exit_code(), 4),
        other => panic!("expected NotADirectory, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_prepare_run_withUnreadableConfig_shouldReportConfigError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.json");

    match Config::prepare_run(temp_dir.path(), Some(missing.as_path()), with_key("sk-test")) {
        Err(e @ AppError::Config(_)) => assert_eq!(e.exit_code(), 6),
        other => panic!("expected Config, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_prepare_run_withoutKey_shouldReportMissingCredential() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(temp_dir.path(), "config.json", "{}")?;

    for overrides in [RunOverrides::default(), with_key(""), with_key("   ")] {
        match Config::prepare_run(temp_dir.path(), Some(config_path.as_path()), overrides) {
            Err(e @ AppError::MissingCredential(_)) => {
                assert_eq!(e.exit_code(), 5);
                assert_eq!(e.to_string(), "OPENAI_API_KEY environment variable is required");
            }
            other => panic!("expected MissingCredential, got {:?}", other),
        }
    }
    Ok(())
}

/// Test that the credential check runs before validation of other fields
#[test]
fn test_prepare_run_withInvalidConfigAndNoKey_shouldReportMissingCredential() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{ "transcription": { "endpoint": "not a url" } }"#,
    )?;

    let result = Config::prepare_run(temp_dir.path(), Some(config_path.as_path()), RunOverrides::default());
    assert!(matches!(result, Err(AppError::MissingCredential(_))));
    Ok(())
}

#[test]
fn test_prepare_run_withInvalidConfigAndKey_shouldReportConfigError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{ "transcription": { "endpoint": "not a url" } }"#,
    )?;

    match Config::prepare_run(temp_dir.path(), Some(config_path.as_path()), with_key("sk-test")) {
        Err(e @ AppError::Config(_)) => assert_eq!(e.exit_code(), 6),
        other => panic!("expected Config, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_prepare_run_withOverrides_shouldTakePrecedenceOverFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{
            "transcription": { "api_key": "sk-from-file", "model": "whisper-file" },
            "subtitles": { "vtt_width": 40 }
        }"#,
    )?;

    let from_file = Config::prepare_run(temp_dir.path(), Some(config_path.as_path()), RunOverrides::default())?;
    assert_eq!(from_file.transcription.api_key, "sk-from-file");
    assert_eq!(from_file.subtitles.vtt_width, Some(40));

    let overrides = RunOverrides {
        api_key: Some("sk-from-cli".to_string()),
        model: Some("whisper-1".to_string()),
        language: Some("fra".to_string()),
        vtt_width: Some(75),
    };
    let config = Config::prepare_run(temp_dir.path(), Some(config_path.as_path()), overrides)?;
    assert_eq!(config.transcription.api_key, "sk-from-cli");
    assert_eq!(config.transcription.model, "whisper-1");
    assert_eq!(config.transcription.language.as_deref(), Some("fra"));
    assert_eq!(config.subtitles.vtt_width, Some(75));
    Ok(())
}
