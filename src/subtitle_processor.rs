use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timestamp::{format_srt_timestamp, format_vtt_timestamp};

// @module: Subtitle rendering from transcription segments

/// Header line every WebVTT file starts with
pub const VTT_HEADER: &str = "WEBVTT";

// @struct: Single timed text segment as returned by the transcription service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    // @field: Start offset in seconds
    pub start: f64,

    // @field: End offset in seconds
    pub end: f64,

    // @field: Segment text, untrimmed
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Segment {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Full transcription of one audio file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptionResult {
    /// Transcript as one block of text
    pub text: String,

    /// Timed segments in service order; index + 1 is the cue number
    pub segments: Vec<Segment>,

    /// Language detected by the service, if reported
    pub language: Option<String>,

    /// Audio duration in seconds, if reported
    pub duration: Option<f64>,
}

/// Supported subtitle output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// Both formats in the order they are written
    pub const ALL: [SubtitleFormat; 2] = [SubtitleFormat::Srt, SubtitleFormat::Vtt];

    // @returns: File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }

    /// Render segments in this format
    pub fn render(&self, segments: &[Segment], options: &RenderOptions) -> String {
        match self {
            Self::Srt => render_srt(segments),
            Self::Vtt => render_vtt(segments, options.vtt_width),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Srt => write!(f, "SRT"),
            Self::Vtt => write!(f, "VTT"),
        }
    }
}

/// Formatting parameters shared by the renderers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// WebVTT cue width in percent
    pub vtt_width: Option<u32>,
}

/// Render segments as SRT
///
/// Each segment becomes one block: the 1-based cue number, the
/// `start --> end` line and the trimmed text, followed by a blank line.
/// Segments are emitted in input order without merging.
pub fn render_srt(segments: &[Segment]) -> String {
    let mut content = String::new();

    for (index, segment) in segments.iter().enumerate() {
        content.push_str(&format!("{}\n", index + 1));
        content.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(segment.start),
            format_srt_timestamp(segment.end)
        ));
        content.push_str(&format!("{}\n\n", segment.text.trim()));
    }

    content
}

/// Render segments as WebVTT
///
/// Same block layout as SRT after the `WEBVTT` header, with dot-separated
/// milliseconds and an optional ` size:<width>%` cue setting.
pub fn render_vtt(segments: &[Segment], width: Option<u32>) -> String {
    let mut content = format!("{}\n\n", VTT_HEADER);
    let settings = vtt_cue_settings(width);

    for (index, segment) in segments.iter().enumerate() {
        content.push_str(&format!("{}\n", index + 1));
        content.push_str(&format!(
            "{} --> {}{}\n",
            format_vtt_timestamp(segment.start),
            format_vtt_timestamp(segment.end),
            settings
        ));
        content.push_str(&format!("{}\n\n", segment.text.trim()));
    }

    content
}

/// Cue settings suffix for a width percentage; empty when no width (or zero) is given
pub fn vtt_cue_settings(width: Option<u32>) -> String {
    match width {
        Some(width) if width > 0 => format!(" size:{}%", width),
        _ => String::new(),
    }
}
