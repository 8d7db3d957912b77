use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Error returned by the subtitle pipeline and the download route
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Rejected input. Nothing was written to disk.
    #[error("{0}")]
    Validation(String),

    /// Transcription, subtitle writing or transcoding failed
    #[error("{0}")]
    Processing(String),

    #[error("File not found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transcription-specific errors
#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("Failed to execute {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Transcription failed: {0}")]
    Failed(String),

    #[error("Failed to read transcription output: {0}")]
    Output(String),

    #[error("Failed to parse transcription output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Transcoder-specific errors
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Failed to execute {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("FFmpeg exited with {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },
}

impl From<TranscribeError> for PipelineError {
    fn from(err: TranscribeError) -> Self {
        PipelineError::Processing(err.to_string())
    }
}

impl From<TranscodeError> for PipelineError {
    fn from(err: TranscodeError) -> Self {
        PipelineError::Processing(err.to_string())
    }
}

impl PipelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PipelineError::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            PipelineError::NotFound => StatusCode::NOT_FOUND,
            PipelineError::Processing(_) | PipelineError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // The download route answers in plain text
            PipelineError::NotFound => (status, "File not found").into_response(),
            _ => {
                let body = serde_json::json!({
                    "status": "error",
                    "message": self.to_string(),
                });
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Startup errors for the server binary
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid bind address {0}: {1}")]
    BindAddress(String, std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PipelineError>;
