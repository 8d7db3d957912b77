//! Whisper CLI transcriber
//!
//! Runs the `whisper` command with JSON output into a scratch directory and
//! maps its segments onto `TranscriptSegment`.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use super::{Transcriber, TranscriptSegment};
use crate::config::TranscriberConfig;
use crate::error::TranscribeError;

/// Whisper JSON output format
#[derive(Debug, Clone, Deserialize)]
pub struct WhisperOutput {
    pub segments: Vec<WhisperSegment>,
    pub language: Option<String>,
}

/// Whisper segment format (only the fields we use)
#[derive(Debug, Clone, Deserialize)]
pub struct WhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl WhisperOutput {
    /// Convert to segments in the order whisper produced them, dropping empty text
    pub fn into_segments(self) -> Vec<TranscriptSegment> {
        self.segments
            .into_iter()
            .map(|seg| TranscriptSegment::new(seg.start, seg.end, &seg.text))
            .filter(|seg| !seg.text.is_empty())
            .collect()
    }
}

/// Parse whisper's JSON output
pub fn parse_output(json: &str) -> Result<Vec<TranscriptSegment>, TranscribeError> {
    let output: WhisperOutput = serde_json::from_str(json)?;
    if let Some(lang) = &output.language {
        debug!("Whisper detected language: {}", lang);
    }
    Ok(output.into_segments())
}

/// Transcriber backed by the `whisper` command line tool
pub struct WhisperTranscriber {
    config: TranscriberConfig,
}

impl WhisperTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    fn command(&self, input: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(input)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("json")
            .arg("--verbose")
            .arg("False");

        if let Some(lang) = &self.config.language {
            cmd.arg("--language").arg(lang);
        }
        cmd
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, path: &Path) -> Result<Vec<TranscriptSegment>, TranscribeError> {
        info!(
            "Transcribing {} with whisper model {}",
            path.display(),
            self.config.model
        );

        let scratch = tempfile::tempdir()
            .map_err(|e| TranscribeError::Output(format!("Failed to create temp directory: {}", e)))?;

        let mut cmd = self.command(path, scratch.path());
        debug!("Executing whisper command: {:?}", cmd);

        let output = cmd.output().await.map_err(|source| TranscribeError::Spawn {
            binary: self.config.binary_path.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscribeError::Failed(stderr.trim().to_string()));
        }

        let stem = path
            .file_stem()
            .ok_or_else(|| TranscribeError::Output("Invalid input filename".to_string()))?;
        let json_file = scratch
            .path()
            .join(format!("{}.json", stem.to_string_lossy()));

        let json = tokio::fs::read_to_string(&json_file)
            .await
            .map_err(|e| TranscribeError::Output(format!("{}: {}", json_file.display(), e)))?;

        let segments = parse_output(&json)?;
        info!("Transcription produced {} segments", segments.len());
        Ok(segments)
    }
}
