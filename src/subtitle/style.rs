//! Burn-in styling
//!
//! Builds the ASS `force_style` string ffmpeg's `subtitles` filter applies
//! to every cue.

/// ASS alignment code for bottom-center; vertical placement comes from `MarginV`
pub const ALIGNMENT_BOTTOM_CENTER: u32 = 2;

/// Vertical placement of the subtitle block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalPosition {
    Top,
    Center,
    #[default]
    Bottom,
}

impl VerticalPosition {
    /// Parse a form value. Anything other than top/center means bottom.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "top" => VerticalPosition::Top,
            "center" => VerticalPosition::Center,
            _ => VerticalPosition::Bottom,
        }
    }

    /// Vertical margin handed to the renderer
    pub fn margin(self) -> u32 {
        match self {
            VerticalPosition::Top => 8,
            VerticalPosition::Center => 50,
            VerticalPosition::Bottom => 92,
        }
    }
}

/// Styling requested for one render
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub font_family: String,
    pub font_size: u32,
    /// BBGGRR hex digits, not validated
    pub primary_color: String,
    pub background_color: Option<String>,
    pub position: VerticalPosition,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 24,
            primary_color: "FFFFFF".to_string(),
            background_color: None,
            position: VerticalPosition::Bottom,
        }
    }
}

/// Strip the `&H`/`&` wrapping clients may send around a color
pub fn strip_color(value: &str) -> String {
    value.trim().replace("&H", "").replace('&', "")
}

/// Characters that delimit filtergraph or `force_style` syntax
const STYLE_DELIMITERS: &[char] = &['\'', '\\', ',', ':', '=', ';', '[', ']'];

/// Remove delimiters and control characters so a form value stays one
/// `Key=Value` pair inside the quoted `force_style` option
pub fn style_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() && !STYLE_DELIMITERS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

impl StyleSpec {
    /// Render the `force_style` descriptor
    pub fn descriptor(&self) -> String {
        let mut parts = vec![
            format!("FontName={}", style_value(&self.font_family)),
            format!("FontSize={}", self.font_size),
            format!("PrimaryColour=&H{}&", style_value(&self.primary_color)),
        ];
        if let Some(bg) = &self.background_color {
            // BorderStyle 3 draws an opaque box in BackColour
            parts.push(format!("BackColour=&H{}&", style_value(bg)));
            parts.push("BorderStyle=3".to_string());
        }
        parts.push(format!("Alignment={}", ALIGNMENT_BOTTOM_CENTER));
        parts.push(format!("MarginV={}", self.position.margin()));
        parts.join(",")
    }
}
