/*!
 * # subwhisper - batch subtitles from video with Whisper
 *
 * A Rust library for turning a folder of MP4 videos into SRT and WebVTT
 * subtitle files using a remote speech-to-text service.
 *
 * ## Features
 *
 * - Extract audio with ffmpeg (constant-bitrate MP3)
 * - Transcribe through the OpenAI audio transcription API with segment timestamps
 * - Render SRT and WebVTT with truncating millisecond timestamps
 * - Skip files whose subtitles already exist, so re-runs are cheap
 * - Isolate per-file failures so one bad video never stops the batch
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timestamp`: Clock-style timestamp formatting
 * - `subtitle_processor`: Segment types and the SRT/WebVTT renderers
 * - `transcoder`: Video to audio conversion behind the `Transcoder` trait
 * - `providers`: Transcription services behind the `TranscriptionProvider` trait:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::mock`: Deterministic collaborators for tests
 * - `media_pipeline`: Validation, conversion, transcription and temp-file cleanup
 * - `app_controller`: Per-file orchestration and the batch driver
 * - `progress`: Progress observers (terminal bars, recorder)
 * - `file_utils`: Discovery and output path derivation
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media_pipeline;
pub mod progress;
pub mod providers;
pub mod subtitle_processor;
pub mod timestamp;
pub mod transcoder;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchSummary, Controller, FileOutcome};
pub use errors::{AppError, PipelineError, ProviderError, TranscodeError};
pub use file_utils::FileTask;
pub use subtitle_processor::{render_srt, render_vtt, Segment, SubtitleFormat, TranscriptionResult};
pub use timestamp::{format_srt_timestamp, format_vtt_timestamp};
