use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{BurnJob, Transcoder};
use crate::config::TranscoderConfig;
use crate::error::TranscodeError;

/// Escape a path for use inside a quoted filtergraph option value
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Build the `-vf` argument for a burn-in render
pub fn subtitles_filter(subtitles: &Path, style: &str) -> String {
    format!(
        "subtitles='{}':force_style='{}'",
        escape_filter_path(subtitles),
        style
    )
}

/// Transcoder backed by the `ffmpeg` command line tool
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    fn command(&self, job: &BurnJob<'_>) -> Command {
        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-y") // Overwrite output
            .arg("-i")
            .arg(job.input)
            .arg("-vf")
            .arg(subtitles_filter(job.subtitles, job.style))
            .arg("-c:a")
            .arg("copy"); // Keep audio unchanged

        for option in &self.config.extra_args {
            cmd.arg(option);
        }

        cmd.arg(job.output);
        cmd
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn burn_subtitles(&self, job: BurnJob<'_>) -> Result<(), TranscodeError> {
        info!(
            "Burning subtitles from {} into {} -> {}",
            job.subtitles.display(),
            job.input.display(),
            job.output.display()
        );

        let mut cmd = self.command(&job);
        debug!("Executing ffmpeg command: {:?}", cmd);

        let output = cmd.output().await.map_err(|source| TranscodeError::Spawn {
            binary: self.config.binary_path.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("ffmpeg failed with {}", output.status);
            return Err(TranscodeError::ExitStatus {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        info!("Subtitle burn-in completed");
        Ok(())
    }

    async fn version(&self) -> Option<String> {
        let output = Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(|line| line.trim().to_string())
    }
}
