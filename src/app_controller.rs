use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::file_utils::{FileManager, FileTask};
use crate::media_pipeline::MediaPipeline;
use crate::progress::{ProgressObserver, Stage};
use crate::providers::TranscriptionProvider;
use crate::providers::openai::OpenAI;
use crate::subtitle_processor::{RenderOptions, SubtitleFormat};
use crate::transcoder::{FfmpegTranscoder, Transcoder};

// @module: Application controller for batch transcription

/// What happened to one discovered file
#[derive(Debug)]
pub enum FileOutcome {
    /// Both outputs already existed
    Skipped,
    /// Both outputs were written
    Succeeded { srt: PathBuf, vtt: PathBuf },
    /// Processing stopped; no output pair was produced
    Failed(PipelineError),
}

/// Counts accumulated over one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub discovered: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Files that went through the pipeline
    pub fn attempted(&self) -> usize {
        self.discovered - self.skipped
    }

    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Succeeded { .. } => self.succeeded += 1,
            FileOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Transcoder and transcription collaborators
    pipeline: MediaPipeline,

    // @field: Re-process files whose outputs already exist
    force_overwrite: bool,
}

impl Controller {
    // @method: Create a controller backed by ffmpeg and the OpenAI API
    pub fn with_config(config: Config) -> Self {
        let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.clone()));
        let provider = Arc::new(OpenAI::from_config(&config.transcription));
        Self::with_collaborators(config, transcoder, provider)
    }

    /// Create a controller with explicit collaborators
    pub fn with_collaborators(
        config: Config,
        transcoder: Arc<dyn Transcoder>,
        provider: Arc<dyn TranscriptionProvider>,
    ) -> Self {
        Self {
            config,
            pipeline: MediaPipeline::new(transcoder, provider),
            force_overwrite: false,
        }
    }

    /// Disable the skip check for files whose outputs already exist
    pub fn force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            vtt_width: self.config.subtitles.vtt_width,
        }
    }

    /// Process one file: skip check, transcription, rendering and writing
    ///
    /// Never returns an error; failures are logged and reported as `FileOutcome::Failed`.
    pub async fn process_file(&self, task: &FileTask, index: usize, total: usize, observer: &dyn ProgressObserver) -> FileOutcome {
        if !self.force_overwrite && task.outputs_exist() {
            info!("⏭️  Skipping {} (SRT and VTT already exist)", task.base_name);
            let outcome = FileOutcome::Skipped;
            observer.file_finished(task, &outcome);
            return outcome;
        }

        info!("📹 Processing file {}/{}: {}", index, total, task.base_name);
        observer.file_started(task, index, total);
        observer.stage(task, Stage::Starting);

        let start_time = Instant::now();
        let outcome = match self.transcribe_and_write(task, observer).await {
            Ok(()) => {
                info!("✅ Subtitles saved to: {}", task.srt_path.display());
                info!("✅ Subtitles saved to: {}", task.vtt_path.display());
                debug!("{} done in {}", task.base_name, Self::format_duration(start_time.elapsed()));
                FileOutcome::Succeeded {
                    srt: task.srt_path.clone(),
                    vtt: task.vtt_path.clone(),
                }
            }
            Err(e) => {
                error!("Failed to process {}: {}", task.base_name, e);
                FileOutcome::Failed(e)
            }
        };

        observer.file_finished(task, &outcome);
        outcome
    }

    async fn transcribe_and_write(&self, task: &FileTask, observer: &dyn ProgressObserver) -> Result<(), PipelineError> {
        let result = self.pipeline.transcribe(task, observer).await?;

        let options = self.render_options();
        let rendered: Vec<(SubtitleFormat, String)> = SubtitleFormat::ALL
            .iter()
            .map(|format| (*format, format.render(&result.segments, &options)))
            .collect();

        let mut written: Vec<&Path> = Vec::with_capacity(rendered.len());
        for (format, content) in &rendered {
            observer.stage(task, match format {
                SubtitleFormat::Srt => Stage::WritingSrt,
                SubtitleFormat::Vtt => Stage::WritingVtt,
            });

            let path = task.output_path(*format);
            if let Err(source) = FileManager::write_to_file(path, content) {
                // Leave no half-written pair behind, including a truncated `path`
                for stale in written.iter().copied().chain(std::iter::once(path)) {
                    if let Err(e) = FileManager::remove_if_exists(stale) {
                        warn!("Failed to remove {}: {}", stale.display(), e);
                    }
                }
                return Err(PipelineError::Write {
                    path: path.to_path_buf(),
                    source,
                });
            }
            written.push(path);
        }

        observer.stage(task, Stage::Complete);
        Ok(())
    }

    /// Process every media file directly inside `input_dir`, one at a time
    pub async fn run_folder(&self, input_dir: &Path, observer: &dyn ProgressObserver) -> Result<BatchSummary, PipelineError> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(PipelineError::Validation(format!("Folder not found: {}", input_dir.display())));
        }

        let media_files = FileManager::find_media_files(input_dir)
            .map_err(|e| PipelineError::Validation(format!("{:#}", e)))?;

        let mut summary = BatchSummary {
            discovered: media_files.len(),
            ..BatchSummary::default()
        };

        if media_files.is_empty() {
            info!("No MP4 files found in: {}", input_dir.display());
            return Ok(summary);
        }

        info!("🎬 Found {} MP4 file(s) in: {}", media_files.len(), input_dir.display());
        observer.batch_started(media_files.len());

        let total = media_files.len();
        for (i, media_file) in media_files.iter().enumerate() {
            let task = FileTask::from_source(media_file);
            let outcome = self.process_file(&task, i + 1, total, observer).await;
            summary.record(&outcome);
        }

        observer.batch_finished(&summary);

        info!(
            "🎉 Batch processing complete: {} discovered, {} skipped, {} succeeded, {} failed ({})",
            summary.discovered,
            summary.skipped,
            summary.succeeded,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
