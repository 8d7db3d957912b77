//! Configuration file support
//!
//! Loads server configuration from TOML files. Every section is optional;
//! missing values keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{parse_extensions, ServerConfig};

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: Option<ServerSettings>,
    /// Upload and temp storage settings
    pub storage: Option<StorageSettings>,
    /// Transcriber settings
    pub transcriber: Option<TranscriberSettings>,
    /// Transcoder settings
    pub transcoder: Option<TranscoderSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: Option<String>,
    /// Port to listen on
    pub port: Option<u16>,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
    /// Scheme used for the public address
    pub url_scheme: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub upload_dir: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
    /// Maximum upload size in MB
    pub max_upload_mb: Option<usize>,
    /// Comma-separated extension list, e.g. "mp4,mov"
    pub allowed_extensions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberSettings {
    pub binary_path: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderSettings {
    pub binary_path: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay the file's values on top of `base`
    pub fn apply_to(self, mut base: ServerConfig) -> ServerConfig {
        if let Some(server) = self.server {
            if let Some(host) = server.host {
                base.host = host;
            }
            if let Some(port) = server.port {
                base.port = port;
            }
            if let Some(cors) = server.cors_enabled {
                base.cors_enabled = cors;
            }
            if let Some(scheme) = server.url_scheme {
                base.url_scheme = scheme;
            }
            if let Some(key) = server.secret_key {
                base.secret_key = key;
            }
        }
        if let Some(storage) = self.storage {
            if let Some(dir) = storage.upload_dir {
                base.upload_dir = dir;
            }
            if let Some(dir) = storage.temp_dir {
                base.temp_dir = dir;
            }
            if let Some(mb) = storage.max_upload_mb {
                base.max_upload_mb = mb;
            }
            if let Some(list) = storage.allowed_extensions {
                base.allowed_extensions = parse_extensions(&list);
            }
        }
        if let Some(t) = self.transcriber {
            if let Some(bin) = t.binary_path {
                base.transcriber.binary_path = bin;
            }
            if let Some(model) = t.model {
                base.transcriber.model = model;
            }
            if t.language.is_some() {
                base.transcriber.language = t.language;
            }
        }
        if let Some(t) = self.transcoder {
            if let Some(bin) = t.binary_path {
                base.transcoder.binary_path = bin;
            }
            if let Some(args) = t.extra_args {
                base.transcoder.extra_args = args;
            }
        }
        base
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        self.apply_to(ServerConfig::default())
    }
}
