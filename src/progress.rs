use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;

use crate::app_controller::{BatchSummary, FileOutcome};
use crate::file_utils::FileTask;

// @module: Progress reporting decoupled from the pipeline

/// Milestones of one file's processing, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Starting,
    ConvertingAudio,
    SubmittingTranscription,
    ProcessingTranscription,
    WritingSrt,
    WritingVtt,
    Complete,
}

impl Stage {
    // @returns: Approximate completion percentage for display
    pub fn percent(&self) -> u64 {
        match self {
            Self::Starting => 0,
            Self::ConvertingAudio => 10,
            Self::SubmittingTranscription => 30,
            Self::ProcessingTranscription => 80,
            Self::WritingSrt => 85,
            Self::WritingVtt => 95,
            Self::Complete => 100,
        }
    }

    // @returns: Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Starting => "Starting...",
            Self::ConvertingAudio => "Converting to MP3...",
            Self::SubmittingTranscription => "Sending to transcription service...",
            Self::ProcessingTranscription => "Processing transcription...",
            Self::WritingSrt => "Creating SRT file...",
            Self::WritingVtt => "Creating VTT file...",
            Self::Complete => "Complete!",
        }
    }
}

/// Receives progress events from the batch driver and the pipeline
///
/// Every method except `stage` has an empty default so observers only
/// implement what they display.
pub trait ProgressObserver: Send + Sync {
    fn batch_started(&self, _total: usize) {}

    fn file_started(&self, _task: &FileTask, _index: usize, _total: usize) {}

    fn stage(&self, task: &FileTask, stage: Stage);

    fn file_finished(&self, _task: &FileTask, _outcome: &FileOutcome) {}

    fn batch_finished(&self, _summary: &BatchSummary) {}
}

/// Observer that discards every event
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn stage(&self, _task: &FileTask, _stage: Stage) {}
}

/// Terminal progress bars: one for the folder, one for the current file
pub struct IndicatifProgress {
    multi_progress: MultiProgress,
    folder_bar: Mutex<Option<ProgressBar>>,
    file_bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self::with_multi_progress(MultiProgress::new())
    }

    /// Draw into an existing `MultiProgress`, e.g. one the logger suspends around its output
    pub fn with_multi_progress(multi_progress: MultiProgress) -> Self {
        Self {
            multi_progress,
            folder_bar: Mutex::new(None),
            file_bar: Mutex::new(None),
        }
    }

    fn style(template: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(template)
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for IndicatifProgress {
    fn batch_started(&self, total: usize) {
        let bar = self.multi_progress.add(ProgressBar::new(total as u64));
        bar.set_style(Self::style(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}",
        ));
        bar.set_message("Processing files");
        *self.folder_bar.lock() = Some(bar);
    }

    fn file_started(&self, task: &FileTask, index: usize, total: usize) {
        let bar = self.multi_progress.add(ProgressBar::new(100));
        bar.set_style(Self::style(
            "{prefix} [{bar:40.cyan/blue}] {percent}% | {msg}",
        ));
        bar.set_prefix(format!("File {}/{}", index, total));
        bar.set_message(Stage::Starting.label());

        if let Some(folder_bar) = self.folder_bar.lock().as_ref() {
            folder_bar.set_message(format!("Processing: {}", task.base_name));
        }
        *self.file_bar.lock() = Some(bar);
    }

    fn stage(&self, _task: &FileTask, stage: Stage) {
        if let Some(bar) = self.file_bar.lock().as_ref() {
            bar.set_position(stage.percent());
            bar.set_message(stage.label());
        }
    }

    fn file_finished(&self, _task: &FileTask, _outcome: &FileOutcome) {
        // Only the folder bar stays visible between files
        if let Some(bar) = self.file_bar.lock().take() {
            bar.finish_and_clear();
        }
        if let Some(folder_bar) = self.folder_bar.lock().as_ref() {
            folder_bar.inc(1);
        }
    }

    fn batch_finished(&self, _summary: &BatchSummary) {
        if let Some(bar) = self.folder_bar.lock().take() {
            bar.finish_with_message("Folder processing complete");
        }
    }
}

/// Observer that records every stage it sees, for assertions in tests
#[derive(Debug, Default)]
pub struct StageRecorder {
    events: Mutex<Vec<(String, Stage)>>,
}

impl StageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages recorded for one file, in arrival order
    pub fn stages_for(&self, base_name: &str) -> Vec<Stage> {
        self.events
            .lock()
            .iter()
            .filter(|(name, _)| name == base_name)
            .map(|(_, stage)| *stage)
            .collect()
    }
}

impl ProgressObserver for StageRecorder {
    fn stage(&self, task: &FileTask, stage: Stage) {
        self.events.lock().push((task.base_name.clone(), stage));
    }
}
