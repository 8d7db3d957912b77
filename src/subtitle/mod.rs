//! Subtitle module
//!
//! This module prepares everything the transcoder needs to burn text in:
//! - SRT serialization of transcript segments (`srt`)
//! - ASS `force_style` descriptor built from request styling (`style`)

pub mod srt;
pub mod style;

pub use srt::write_srt;
pub use style::{StyleSpec, VerticalPosition};
