//! HTTP request handlers
//!
//! Implements the landing page, liveness and version checks, the
//! `/generate` pipeline entry point and the one-shot download route.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::info;

use super::form::{GenerateForm, GenerateResponse};
use crate::cleanup::cleanup;
use crate::error::PipelineError;
use crate::pipeline;
use crate::state::AppState;
use crate::upload::{OUTPUT_EXTENSION, OUTPUT_SUFFIX};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Landing page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Version information endpoint
pub async fn version_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let ffmpeg = state
        .transcoder
        .version()
        .await
        .unwrap_or_else(|| "unavailable".to_string());

    Json(serde_json::json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "ffmpeg": ffmpeg,
    }))
}

/// Subtitle generation endpoint
/// POST /generate (multipart)
pub async fn generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, PipelineError> {
    let form = GenerateForm::from_multipart(multipart).await?;
    let (video, style) = form.into_job(&state.config.allowed_extensions)?;

    info!(
        "Generating subtitles for {} (style: {})",
        video.filename,
        style.descriptor()
    );

    let rendered = pipeline::process(&state, video, &style).await?;
    info!(
        "{} ready with {} subtitles",
        rendered.output_name, rendered.segments
    );
    Ok(Json(rendered.into()))
}

/// Only rendered outputs are downloadable
fn is_output_name(name: &str) -> bool {
    let suffix = format!("{}.{}", OUTPUT_SUFFIX, OUTPUT_EXTENSION);
    name.len() > suffix.len() && name.ends_with(&suffix)
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
        Some(ext) if ext == "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// Download endpoint. The file is unlinked once opened and streamed from the
/// open handle, so a second request gets 404.
/// GET /download/{filename}
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, PipelineError> {
    // Drop any directory components smuggled in via percent-encoding
    let name = std::path::Path::new(&filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| is_output_name(n))
        .ok_or(PipelineError::NotFound)?;

    let path = state.config.temp_dir.join(&name);
    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PipelineError::NotFound)
        }
        Err(e) => return Err(e.into()),
    };
    let len = file.metadata().await?.len();
    cleanup(&[&path]);
    info!("Streaming {} ({} bytes), file removed", name, len);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&name)),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((headers, body).into_response())
}
