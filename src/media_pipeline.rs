use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::PipelineError;
use crate::file_utils::{FileManager, FileTask, MEDIA_EXTENSION};
use crate::progress::{ProgressObserver, Stage};
use crate::providers::TranscriptionProvider;
use crate::subtitle_processor::TranscriptionResult;
use crate::transcoder::Transcoder;

// @module: Video to transcript pipeline

/// Intermediate file removed when the guard goes out of scope
///
/// Covers success, error returns and task cancellation. A killed process
/// still leaves the file behind.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = FileManager::remove_if_exists(&self.path) {
            warn!("Failed to remove temporary file {}: {}", self.path.display(), e);
        }
    }
}

/// Converts a source video to audio and transcribes it
#[derive(Debug, Clone)]
pub struct MediaPipeline {
    transcoder: Arc<dyn Transcoder>,
    provider: Arc<dyn TranscriptionProvider>,
}

impl MediaPipeline {
    pub fn new(transcoder: Arc<dyn Transcoder>, provider: Arc<dyn TranscriptionProvider>) -> Self {
        Self { transcoder, provider }
    }

    /// Check that the source exists and is a supported media file
    pub fn validate_source(source: &Path) -> Result<(), PipelineError> {
        if !source.exists() {
            return Err(PipelineError::Validation(format!("File not found: {}", source.display())));
        }
        if !source.is_file() {
            return Err(PipelineError::Validation(format!("Not a file: {}", source.display())));
        }
        if !FileManager::is_media_file(source) {
            return Err(PipelineError::Validation(format!(
                "Only {} files are supported: {}",
                MEDIA_EXTENSION.to_uppercase(),
                source.display()
            )));
        }
        Ok(())
    }

    /// Transcribe one source file
    ///
    /// Segments are returned exactly as the provider produced them.
    pub async fn transcribe(&self, task: &FileTask, observer: &dyn ProgressObserver) -> Result<TranscriptionResult, PipelineError> {
        Self::validate_source(&task.source_path)?;

        let audio = TempArtifact::new(&task.temp_audio_path);

        observer.stage(task, Stage::ConvertingAudio);
        self.transcoder.transcode(&task.source_path, audio.path()).await?;
        debug!("Converted {} to {}", task.source_path.display(), audio.path().display());

        observer.stage(task, Stage::SubmittingTranscription);
        let result = self.provider.transcribe(audio.path()).await?;

        observer.stage(task, Stage::ProcessingTranscription);
        debug!("{} returned {} segments for {}", self.provider.name(), result.segments.len(), task.base_name);

        Ok(result)
    }
}
