/*!
 * Common test utilities for the subwhisper test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use subwhisper::app_config::Config;

/// Routes library logs through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates placeholder videos; the mock transcoder never reads their content
pub fn create_fake_videos(dir: &Path, filenames: &[&str]) -> Result<Vec<PathBuf>> {
    filenames
        .iter()
        .map(|name| create_test_file(dir, name, "not really a video"))
        .collect()
}

/// Configuration that passes validation without touching the environment
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.transcription.api_key = "sk-test".to_string();
    config
}

/// Names of every entry directly inside `dir`, sorted
pub fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().to_string()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
