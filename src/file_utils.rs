use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::subtitle_processor::SubtitleFormat;

// @module: File and directory utilities

/// The only media container the pipeline accepts
pub const MEDIA_EXTENSION: &str = "mp4";

/// Suffix appended to the base name for the intermediate audio file
pub const TEMP_AUDIO_SUFFIX: &str = "_temp.mp3";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Whether the path carries the supported media extension (case-insensitive)
    pub fn is_media_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(MEDIA_EXTENSION))
    }

    /// Find media files among the immediate entries of a directory
    ///
    /// The listing is not recursive and keeps the order in which the
    /// directory yields its entries.
    pub fn find_media_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_media_file(path) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }

    /// Remove a file, treating an already missing file as success
    pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Paths derived from one source media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// The source video
    pub source_path: PathBuf,

    /// File name without the media extension
    pub base_name: String,

    /// SRT output alongside the source
    pub srt_path: PathBuf,

    /// WebVTT output alongside the source
    pub vtt_path: PathBuf,

    /// Intermediate audio file alongside the source
    pub temp_audio_path: PathBuf,
}

impl FileTask {
    /// Derive every path for a source file
    ///
    /// The media extension is stripped case-insensitively; any other extension
    /// is kept as part of the base name so validation can reject the file later.
    pub fn from_source<P: AsRef<Path>>(source: P) -> Self {
        let source_path = source.as_ref().to_path_buf();
        let dir = source_path.parent().map(Path::to_path_buf).unwrap_or_default();

        let base_name = if FileManager::is_media_file(&source_path) {
            source_path.file_stem()
        } else {
            source_path.file_name()
        }
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

        FileTask {
            srt_path: dir.join(format!("{}.{}", base_name, SubtitleFormat::Srt.extension())),
            vtt_path: dir.join(format!("{}.{}", base_name, SubtitleFormat::Vtt.extension())),
            temp_audio_path: dir.join(format!("{}{}", base_name, TEMP_AUDIO_SUFFIX)),
            source_path,
            base_name,
        }
    }

    /// Output path for a subtitle format
    pub fn output_path(&self, format: SubtitleFormat) -> &Path {
        match format {
            SubtitleFormat::Srt => &self.srt_path,
            SubtitleFormat::Vtt => &self.vtt_path,
        }
    }

    /// Whether both subtitle outputs are already on disk
    pub fn outputs_exist(&self) -> bool {
        self.srt_path.exists() && self.vtt_path.exists()
    }
}
