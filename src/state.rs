//! Application state
//!
//! This module defines the AppState structure that holds:
//! - Server configuration
//! - The transcription backend
//! - The transcoding backend
//!
//! It is built once at startup and shared read-only across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::transcode::{FfmpegTranscoder, Transcoder};
use crate::transcribe::{Transcriber, WhisperTranscriber};

/// Application state shared across all handlers
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Speech-to-text backend
    pub transcriber: Arc<dyn Transcriber>,

    /// Subtitle burn-in backend
    pub transcoder: Arc<dyn Transcoder>,
}

impl AppState {
    /// Create state using the whisper and ffmpeg command line tools
    pub fn new(config: ServerConfig) -> Self {
        let transcriber = Arc::new(WhisperTranscriber::new(config.transcriber.clone()));
        let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.clone()));
        Self::with_backends(config, transcriber, transcoder)
    }

    /// Create state with explicit backends
    pub fn with_backends(
        config: ServerConfig,
        transcriber: Arc<dyn Transcriber>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            config,
            transcriber,
            transcoder,
        }
    }

    /// Create the upload and temp directories
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config.upload_dir)?;
        std::fs::create_dir_all(&self.config.temp_dir)?;
        Ok(())
    }
}
