//! Subtitle burn-in module
//!
//! This module composites subtitles onto the video pixels:
//! - `BurnJob`, the paths and style for one render
//! - `Transcoder` trait, the seam between the pipeline and the encoder
//! - ffmpeg CLI implementation

pub mod ffmpeg;

use async_trait::async_trait;
use std::path::Path;

use crate::error::TranscodeError;

pub use ffmpeg::FfmpegTranscoder;

/// Inputs for one burn-in render
#[derive(Debug, Clone, Copy)]
pub struct BurnJob<'a> {
    /// Source video
    pub input: &'a Path,
    /// SRT file to render
    pub subtitles: &'a Path,
    /// ASS `force_style` descriptor
    pub style: &'a str,
    /// Destination video
    pub output: &'a Path,
}

/// Transcoding capability used by the pipeline
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Render `job.subtitles` into `job.input`, writing `job.output`.
    /// Returns once the encoder has exited.
    async fn burn_subtitles(&self, job: BurnJob<'_>) -> Result<(), TranscodeError>;

    /// Human-readable encoder version, if it can be determined
    async fn version(&self) -> Option<String> {
        None
    }
}
