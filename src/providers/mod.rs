/*!
 * Provider implementations for transcription services.
 *
 * This module contains client implementations behind a common trait:
 * - OpenAI: Whisper transcription API integration
 * - Mock: deterministic collaborators for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::ProviderError;
use crate::subtitle_processor::TranscriptionResult;

/// Common trait for all transcription providers
///
/// Implementations receive a finished audio file, submit it with
/// segment-level timestamp granularity, and return the transcript with its
/// segments in the order the service produced them.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + Debug {
    /// Human readable provider name, used in logs
    fn name(&self) -> &str;

    /// Transcribe an audio file
    ///
    /// # Arguments
    /// * `audio_path` - Path of the audio file to stream to the service
    ///
    /// # Returns
    /// * `Result<TranscriptionResult, ProviderError>` - The transcript or an error
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, ProviderError>;
}

pub mod openai;
pub mod mock;
