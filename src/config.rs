//! Server configuration
//!
//! A single `ServerConfig` value is built at startup (defaults, then the
//! optional TOML file, then environment overrides) and handed to the router.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Secret used when `SECRET_KEY` is not set
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-change-me";

/// Transcriber (whisper CLI) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper binary
    pub binary_path: String,

    /// Model name passed to `--model`
    pub model: String,

    /// Spoken language hint; auto-detected when unset
    pub language: Option<String>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: "whisper".to_string(),
            model: "base".to_string(),
            language: None,
        }
    }
}

/// Transcoder (ffmpeg CLI) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Path to the ffmpeg binary
    pub binary_path: String,

    /// Extra output options inserted before the output path,
    /// e.g. `["-preset", "veryfast", "-crf", "23"]`
    pub extra_args: Vec<String>,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Secret key. Carried for parity with the deployment environment.
    pub secret_key: String,

    /// Maximum upload size in megabytes
    pub max_upload_mb: usize,

    /// Where uploaded videos are written while they are processed
    pub upload_dir: PathBuf,

    /// Where subtitle files and rendered outputs live
    pub temp_dir: PathBuf,

    /// Lowercased file extensions accepted by `/generate`
    pub allowed_extensions: HashSet<String>,

    /// Scheme used when logging the public address
    pub url_scheme: String,

    /// Enable CORS
    pub cors_enabled: bool,

    pub transcriber: TranscriberConfig,

    pub transcoder: TranscoderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            max_upload_mb: 500,
            upload_dir: PathBuf::from("uploads"),
            temp_dir: PathBuf::from("temp"),
            allowed_extensions: parse_extensions("mp4"),
            url_scheme: "http".to_string(),
            cors_enabled: true,
            transcriber: TranscriberConfig::default(),
            transcoder: TranscoderConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get maximum upload size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Result<Self, String> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SECRET_KEY") {
            self.secret_key = v;
        }
        if let Some(v) = lookup("MAX_CONTENT_LENGTH_MB") {
            self.max_upload_mb = v
                .trim()
                .parse()
                .map_err(|_| format!("MAX_CONTENT_LENGTH_MB is not a number: {}", v))?;
        }
        if let Some(v) = lookup("UPLOAD_FOLDER") {
            self.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("TEMP_FOLDER") {
            self.temp_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("ALLOWED_EXTENSIONS") {
            self.allowed_extensions = parse_extensions(&v);
        }
        if let Some(v) = lookup("PREFERRED_URL_SCHEME") {
            self.url_scheme = v;
        }
        if let Some(v) = lookup("HOST") {
            self.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.port = v
                .trim()
                .parse()
                .map_err(|_| format!("PORT is not a valid port: {}", v))?;
        }
        if let Some(v) = lookup("FFMPEG_BINARY") {
            self.transcoder.binary_path = v;
        }
        if let Some(v) = lookup("WHISPER_BINARY") {
            self.transcriber.binary_path = v;
        }
        if let Some(v) = lookup("WHISPER_MODEL") {
            self.transcriber.model = v;
        }
        if let Some(v) = lookup("WHISPER_LANGUAGE") {
            self.transcriber.language = Some(v).filter(|l| !l.is_empty());
        }
        Ok(self)
    }

    /// True when the secret key was never overridden
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// Parse a comma-separated extension list into a lowercased set
pub fn parse_extensions(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
