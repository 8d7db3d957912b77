//! Upload validation
//!
//! Checks the extension allow-set and reduces client-supplied filenames to a
//! safe form before anything touches the filesystem.

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{PipelineError, Result};

/// Suffix appended to the input stem to name the rendered video
pub const OUTPUT_SUFFIX: &str = "_subtitled";

/// Container extension of the rendered video
pub const OUTPUT_EXTENSION: &str = "mp4";

fn strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static regex"))
}

/// True when `filename` has an extension in `allowed` (case-insensitive)
pub fn allowed_file(filename: &str, allowed: &HashSet<String>) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => allowed.contains(&ext.to_lowercase()),
        None => false,
    }
}

/// Reduce a client-supplied filename to `[A-Za-z0-9_.-]`.
///
/// Path separators become whitespace, whitespace runs become `_`, other
/// characters are dropped and leading/trailing dots and underscores are
/// stripped. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    strip_re()
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Validate an upload and return the name it will be stored under
pub fn validate_upload(filename: Option<&str>, allowed: &HashSet<String>) -> Result<String> {
    let filename = filename.ok_or_else(|| PipelineError::validation("No file part"))?;
    if filename.is_empty() {
        return Err(PipelineError::validation("No selected file"));
    }
    if !allowed_file(filename, allowed) {
        return Err(PipelineError::validation("Invalid file type"));
    }

    let safe = secure_filename(filename);
    // Sanitizing can eat the extension, e.g. "../.mp4" -> "mp4"
    if safe.is_empty() || !allowed_file(&safe, allowed) {
        return Err(PipelineError::validation("Invalid file type"));
    }
    Ok(safe)
}

/// Name of the rendered video for a stored upload, e.g. `clip.mp4` -> `clip_subtitled.mp4`
pub fn output_name(stored_name: &str) -> String {
    let stem = Path::new(stored_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| stored_name.to_string());
    format!("{}{}.{}", stem, OUTPUT_SUFFIX, OUTPUT_EXTENSION)
}
