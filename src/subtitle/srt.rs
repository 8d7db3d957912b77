use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::transcribe::TranscriptSegment;

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let total_milliseconds = (seconds * 1000.0).round() as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Render segments as SRT: 1-based number, time range, text, blank line
pub fn render_srt(segments: &[TranscriptSegment]) -> String {
    let mut srt = String::new();
    for (index, segment) in segments.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = write!(
            srt,
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_time(segment.start),
            format_time(segment.end),
            segment.text.trim()
        );
    }
    srt
}

/// Write segments to `path` as an SRT file
pub async fn write_srt(segments: &[TranscriptSegment], path: &Path) -> std::io::Result<()> {
    info!(
        "Writing {} subtitle blocks to {}",
        segments.len(),
        path.display()
    );
    fs::write(path, render_srt(segments)).await
}
