//! Speech-to-text module
//!
//! This module turns a stored video into timed text:
//! - `TranscriptSegment`, the normalized unit handed to the subtitle writer
//! - `Transcriber` trait, the seam between the pipeline and the model
//! - whisper CLI implementation

pub mod whisper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TranscribeError;

pub use whisper::WhisperTranscriber;

/// One timed piece of transcribed speech, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptSegment {
    /// Build a segment, trimming the text and collapsing line breaks to spaces
    pub fn new(start: f64, end: f64, text: &str) -> Self {
        Self {
            start: start.max(0.0),
            end,
            text: normalize_text(text),
        }
    }
}

/// Trim and collapse newlines into single spaces
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Transcription capability used by the pipeline
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the media file at `path` into segments, in chronological order
    async fn transcribe(&self, path: &Path) -> Result<Vec<TranscriptSegment>, TranscribeError>;
}
