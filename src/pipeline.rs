//! Subtitle pipeline
//!
//! One request runs these steps in order:
//! save upload -> transcribe -> write SRT -> burn in -> report.
//!
//! The upload, the SRT file and the in-progress render are registered with a
//! `TempFiles` guard, so they are removed on every exit path. A finished
//! render is renamed to its download name and left in the temp directory for
//! the download route, which deletes it once served.

use bytes::Bytes;
use std::path::Path;
use tracing::{error, info};
use uuid::Uuid;

use crate::cleanup::TempFiles;
use crate::error::{PipelineError, Result};
use crate::state::AppState;
use crate::subtitle::{write_srt, StyleSpec};
use crate::transcode::BurnJob;
use crate::upload::output_name;

/// A validated upload. `filename` is already sanitized.
#[derive(Debug, Clone)]
pub struct UploadedVideo {
    pub filename: String,
    pub data: Bytes,
}

/// Result of a successful render
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitledVideo {
    /// File name inside the temp directory
    pub output_name: String,
    /// Relative URL the client downloads it from
    pub download_url: String,
    /// Number of subtitle blocks burned in
    pub segments: usize,
}

/// URL the download route serves `name` under
pub fn download_url(name: &str) -> String {
    format!("/download/{}", name)
}

/// Run the full pipeline for one upload
pub async fn process(
    state: &AppState,
    video: UploadedVideo,
    style: &StyleSpec,
) -> Result<SubtitledVideo> {
    let config = &state.config;
    let mut temp = TempFiles::new();

    // Saved
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::create_dir_all(&config.temp_dir).await?;
    let input_path = temp.register(config.upload_dir.join(&video.filename));
    tokio::fs::write(&input_path, &video.data).await?;
    info!(
        "Saved upload {} ({} bytes)",
        input_path.display(),
        video.data.len()
    );

    let job_id = Uuid::new_v4();
    let srt_path = temp.register(config.temp_dir.join(format!("{}.srt", job_id)));
    // A failed render must leave any earlier `<stem>_subtitled.mp4` intact
    let partial_path = temp.register(config.temp_dir.join(format!("{}.partial.mp4", job_id)));
    let output_name = output_name(&video.filename);
    let output_path = config.temp_dir.join(&output_name);

    let result = render(state, &input_path, &srt_path, &partial_path, style).await;
    let segments = match result {
        Ok(segments) => segments,
        Err(e) => {
            error!("Pipeline failed for {}: {}", video.filename, e);
            return Err(e);
        }
    };

    tokio::fs::rename(&partial_path, &output_path).await?;
    info!("Rendered {} with {} subtitles", output_name, segments);
    Ok(SubtitledVideo {
        download_url: download_url(&output_name),
        output_name,
        segments,
    })
    // `temp` drops here and removes the upload, the SRT and any partial render
}

/// Transcribe, write subtitles and burn them in. Returns the segment count.
async fn render(
    state: &AppState,
    input_path: &Path,
    srt_path: &Path,
    output_path: &Path,
    style: &StyleSpec,
) -> Result<usize> {
    // Transcribed
    let segments = state.transcriber.transcribe(input_path).await?;
    info!("Transcribed {} segments", segments.len());

    // SubtitlesWritten
    write_srt(&segments, srt_path)
        .await
        .map_err(|e| PipelineError::Processing(format!("Failed to write subtitles: {}", e)))?;

    // Transcoded
    let descriptor = style.descriptor();
    state
        .transcoder
        .burn_subtitles(BurnJob {
            input: input_path,
            subtitles: srt_path,
            style: &descriptor,
            output: output_path,
        })
        .await?;

    Ok(segments.len())
}
