//! Text layers.

use super::color::TRANSPARENT;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a text layer.
pub type LayerId = String;

/// Allowed range for font size.
pub const FONT_SIZE_RANGE: (f64, f64) = (8.0, 200.0);
/// Allowed range for the line-height multiplier.
pub const LINE_HEIGHT_RANGE: (f64, f64) = (0.8, 2.5);
/// Allowed range for letter spacing (design px).
pub const LETTER_SPACING_RANGE: (f64, f64) = (-2.0, 20.0);
/// Allowed range for layer width (percent of slide width).
pub const WIDTH_RANGE: (f64, f64) = (10.0, 100.0);
/// Allowed range for layer position (percent of slide).
pub const POSITION_RANGE: (f64, f64) = (0.0, 100.0);

pub(crate) fn clamp_to(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

/// Mint a fresh element id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Role a new layer is created for; decides its starting presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerRole {
    Title,
    Subtitle,
    Body,
    Caption,
    #[default]
    Default,
}

impl LayerRole {
    /// Parse a role name (`title`, `subtitle`, `body`, `caption`); anything else is `Default`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => LayerRole::Title,
            "subtitle" => LayerRole::Subtitle,
            "body" => LayerRole::Body,
            "caption" => LayerRole::Caption,
            _ => LayerRole::Default,
        }
    }
}

/// A positioned, styled block of text on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: LayerId,
    pub content: String,
    /// Left edge, percent of slide width.
    pub x: f64,
    /// Top edge, percent of slide height.
    pub y: f64,
    /// Box width, percent of slide width.
    pub w: f64,
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    pub background_color: String,
    pub align: TextAlign,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    pub line_height: f64,
    pub letter_spacing: f64,
}

impl TextLayer {
    /// Create a layer with the presentation defaults for `role`.
    pub fn new(role: LayerRole) -> Self {
        let base = Self {
            id: new_id(),
            content: String::new(),
            x: 10.0,
            y: 50.0,
            w: 80.0,
            font_family: "'Inter', sans-serif".to_string(),
            font_size: 16.0,
            color: "#000000".to_string(),
            background_color: TRANSPARENT.to_string(),
            align: TextAlign::Left,
            is_bold: false,
            is_italic: false,
            is_underline: false,
            line_height: 1.2,
            letter_spacing: 0.0,
        };

        match role {
            LayerRole::Title => Self {
                content: "Main Title".to_string(),
                y: 10.0,
                font_family: "'Playfair Display', serif".to_string(),
                font_size: 32.0,
                color: "#5A3A29".to_string(),
                is_bold: true,
                ..base
            },
            LayerRole::Subtitle => Self {
                content: "Catchy Subtitle".to_string(),
                y: 25.0,
                font_family: "'Montserrat', sans-serif".to_string(),
                font_size: 20.0,
                color: "#D4AF37".to_string(),
                ..base
            },
            LayerRole::Body => Self {
                content: "Your main text goes here.".to_string(),
                y: 35.0,
                font_family: "'Montserrat', sans-serif".to_string(),
                font_size: 14.0,
                color: "#5A3A29".to_string(),
                ..base
            },
            LayerRole::Caption => Self {
                content: "Caption / Detail".to_string(),
                y: 90.0,
                font_size: 10.0,
                background_color: "#FFFFFF".to_string(),
                ..base
            },
            LayerRole::Default => Self {
                content: "New Text".to_string(),
                ..base
            },
        }
    }

    /// Copy this layer under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }

    /// Whether the layer paints a background box.
    pub fn has_background(&self) -> bool {
        !super::color::is_transparent(&self.background_color)
    }

    /// Return a copy with `edit` applied. Numeric edits are clamped to their valid range.
    pub fn with_edit(&self, edit: LayerEdit) -> Self {
        let mut next = self.clone();
        match edit {
            LayerEdit::Content(v) => next.content = v,
            LayerEdit::X(v) => next.x = clamp_to(v, POSITION_RANGE),
            LayerEdit::Y(v) => next.y = clamp_to(v, POSITION_RANGE),
            LayerEdit::Width(v) => next.w = clamp_to(v, WIDTH_RANGE),
            LayerEdit::FontFamily(v) => next.font_family = v,
            LayerEdit::FontSize(v) => next.font_size = clamp_to(v, FONT_SIZE_RANGE),
            LayerEdit::Color(v) => next.color = v,
            LayerEdit::BackgroundColor(v) => next.background_color = v,
            LayerEdit::Align(v) => next.align = v,
            LayerEdit::Bold(v) => next.is_bold = v,
            LayerEdit::Italic(v) => next.is_italic = v,
            LayerEdit::Underline(v) => next.is_underline = v,
            LayerEdit::LineHeight(v) => next.line_height = clamp_to(v, LINE_HEIGHT_RANGE),
            LayerEdit::LetterSpacing(v) => next.letter_spacing = clamp_to(v, LETTER_SPACING_RANGE),
        }
        next
    }
}

/// A single-field change to a text layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEdit {
    Content(String),
    X(f64),
    Y(f64),
    Width(f64),
    FontFamily(String),
    FontSize(f64),
    Color(String),
    BackgroundColor(String),
    Align(TextAlign),
    Bold(bool),
    Italic(bool),
    Underline(bool),
    LineHeight(f64),
    LetterSpacing(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle_defaults() {
        let layer = TextLayer::new(LayerRole::Subtitle);
        assert_eq!(layer.content, "Catchy Subtitle");
        assert_eq!(layer.font_size, 20.0);
        assert_eq!(layer.align, TextAlign::Left);
        assert!(!layer.is_bold);
        assert!(!layer.has_background());
    }

    #[test]
    fn test_title_is_bold() {
        let layer = TextLayer::new(LayerRole::Title);
        assert!(layer.is_bold);
        assert!(!layer.is_italic);
        assert!(!layer.is_underline);
    }

    #[test]
    fn test_caption_has_white_background() {
        let layer = TextLayer::new(LayerRole::Caption);
        assert_eq!(layer.background_color, "#FFFFFF");
        assert!(layer.has_background());
        assert_eq!(layer.y, 90.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = TextLayer::new(LayerRole::Body);
        let b = TextLayer::new(LayerRole::Body);
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, a.duplicate().id);
    }

    #[test]
    fn test_edits_clamp() {
        let layer = TextLayer::new(LayerRole::Default);
        assert_eq!(layer.with_edit(LayerEdit::FontSize(500.0)).font_size, 200.0);
        assert_eq!(layer.with_edit(LayerEdit::FontSize(2.0)).font_size, 8.0);
        assert_eq!(layer.with_edit(LayerEdit::Width(5.0)).w, 10.0);
        assert_eq!(layer.with_edit(LayerEdit::X(-3.0)).x, 0.0);
        assert_eq!(layer.with_edit(LayerEdit::LineHeight(3.0)).line_height, 2.5);
        assert_eq!(layer.with_edit(LayerEdit::LetterSpacing(-9.0)).letter_spacing, -2.0);
    }

    #[test]
    fn test_edit_leaves_original_untouched() {
        let layer = TextLayer::new(LayerRole::Title);
        let edited = layer.with_edit(LayerEdit::Content(String::new()));
        assert_eq!(layer.content, "Main Title");
        assert!(edited.content.is_empty());
        assert_eq!(edited.id, layer.id);
    }

    #[test]
    fn test_wire_names() {
        let layer = TextLayer::new(LayerRole::Title);
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["fontFamily"], "'Playfair Display', serif");
        assert_eq!(json["isBold"], true);
        assert_eq!(json["align"], "left");
        assert_eq!(json["backgroundColor"], "transparent");
    }
}
