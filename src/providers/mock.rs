/*!
 * Mock collaborators for testing.
 *
 * - `MockTranscriber` returns canned segments and can be told to fail for
 *   particular files, so batch behaviour can be exercised without network access.
 * - `MockTranscoder` writes a small fake audio file instead of running ffmpeg.
 *
 * Both record every call they receive.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::{ProviderError, TranscodeError};
use crate::file_utils::TEMP_AUDIO_SUFFIX;
use crate::providers::TranscriptionProvider;
use crate::subtitle_processor::{Segment, TranscriptionResult};
use crate::transcoder::Transcoder;

/// A call received by a mock collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Path handed to the collaborator
    pub path: PathBuf,
    /// Whether that path existed when the call arrived
    pub existed: bool,
}

// Base name of a source video or of its intermediate audio file
fn base_name_of(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    match file_name.strip_suffix(TEMP_AUDIO_SUFFIX) {
        Some(base) => base.to_string(),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

/// Mock transcription service
#[derive(Debug)]
pub struct MockTranscriber {
    /// Result returned for every successful call
    result: TranscriptionResult,
    /// Base names whose audio should fail to transcribe
    failing: Mutex<HashSet<String>>,
    /// Calls received so far
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTranscriber {
    /// Create a mock that answers every call with `segments`
    pub fn new(segments: Vec<Segment>) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            result: TranscriptionResult {
                text,
                segments,
                language: Some("english".to_string()),
                duration: None,
            },
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock with three short, strictly increasing segments
    pub fn working() -> Self {
        Self::new(vec![
            Segment::new(0.0, 1.5, " First line. "),
            Segment::new(1.5, 3.25, " Second line. "),
            Segment::new(3.25, 5.0, " Third line. "),
        ])
    }

    /// Fail every transcription of the audio extracted from `base_name`
    pub fn fail_for(self, base_name: impl Into<String>) -> Self {
        self.failing.lock().insert(base_name.into());
        self
    }

    /// Number of transcription calls made
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// All calls made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TranscriptionProvider for MockTranscriber {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, ProviderError> {
        self.calls.lock().push(RecordedCall {
            path: audio_path.to_path_buf(),
            existed: audio_path.exists(),
        });

        let should_fail = self.failing.lock().contains(&base_name_of(audio_path));
        if should_fail {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: "Mock transcription failure".to_string(),
            });
        }

        Ok(self.result.clone())
    }
}

/// Mock audio transcoder
#[derive(Debug, Default)]
pub struct MockTranscoder {
    /// Source base names that should fail to convert
    failing: Mutex<HashSet<String>>,
    /// Number of conversions attempted
    count: AtomicUsize,
}

impl MockTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every conversion of the source video named `base_name`
    pub fn fail_for(self, base_name: impl Into<String>) -> Self {
        self.failing.lock().insert(base_name.into());
        self
    }

    /// Number of conversions attempted
    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        self.count.fetch_add(1, Ordering::SeqCst);

        let should_fail = self.failing.lock().contains(&base_name_of(input));
        if should_fail {
            return Err(TranscodeError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }

        tokio::fs::write(output, b"ID3 mock audio")
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: "mock".to_string(),
                source,
            })
    }
}
