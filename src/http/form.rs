//! `/generate` form handling
//!
//! Reads the multipart body into a `GenerateForm` and turns it into a
//! validated upload plus render style.

use axum::extract::Multipart;
use bytes::Bytes;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::{PipelineError, Result};
use crate::pipeline::{SubtitledVideo, UploadedVideo};
use crate::subtitle::style::strip_color;
use crate::subtitle::{StyleSpec, VerticalPosition};
use crate::upload::validate_upload;

/// A file part of the form
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Client-supplied name; empty when the browser sent none
    pub filename: String,
    pub data: Bytes,
}

/// Raw `/generate` form fields
#[derive(Debug, Clone, Default)]
pub struct GenerateForm {
    pub file: Option<FilePart>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_color: Option<String>,
    pub bg_color: Option<String>,
    pub position: Option<String>,
}

/// Success body for `/generate`
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub message: String,
    pub download_url: String,
}

impl From<SubtitledVideo> for GenerateResponse {
    fn from(video: SubtitledVideo) -> Self {
        Self {
            status: "success",
            message: "Subtitles generated successfully".to_string(),
            download_url: video.download_url,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl GenerateForm {
    /// Drain a multipart body. Unknown fields are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = GenerateForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| PipelineError::validation(format!("Invalid form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| PipelineError::validation(format!("Invalid form data: {}", e)))?;
                form.file = Some(FilePart { filename, data });
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| PipelineError::validation(format!("Invalid form data: {}", e)))?;
            match name.as_str() {
                "font_family" => form.font_family = Some(value),
                "font_size" => form.font_size = Some(value),
                "font_color" => form.font_color = Some(value),
                "bg_color" => form.bg_color = Some(value),
                "position" => form.position = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate the upload and build the render style
    pub fn into_job(self, allowed: &HashSet<String>) -> Result<(UploadedVideo, StyleSpec)> {
        let filename = validate_upload(self.file.as_ref().map(|f| f.filename.as_str()), allowed)?;
        // validate_upload only succeeds when a file part exists
        let data = self.file.map(|f| f.data).unwrap_or_default();

        let defaults = StyleSpec::default();
        let font_size = match non_empty(self.font_size) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| PipelineError::validation("Invalid font size"))?,
            None => defaults.font_size,
        };

        let style = StyleSpec {
            font_family: non_empty(self.font_family).unwrap_or(defaults.font_family),
            font_size,
            primary_color: non_empty(self.font_color.map(|c| strip_color(&c)))
                .unwrap_or(defaults.primary_color),
            background_color: non_empty(self.bg_color.map(|c| strip_color(&c))),
            position: self
                .position
                .as_deref()
                .map(VerticalPosition::parse)
                .unwrap_or_default(),
        };

        Ok((UploadedVideo { filename, data }, style))
    }
}
