//! Backend-agnostic description of a rendered slide.
//!
//! A [`Composition`] is a flat, bottom-to-top list of positioned [`Element`]s in screen pixels.
//! The interactive frontend draws it directly; export serializes it to SVG and rasterizes it.

use carousel_core::interaction::HitTarget;
use carousel_core::model::{LayerId, TextAlign};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use peniko::Color;

/// Design canvas width; every preset scales from this.
pub const BASE_WIDTH: f64 = 320.0;
/// Design canvas height.
pub const BASE_HEIGHT: f64 = 400.0;

/// Shown in place of empty text while editing.
pub const PLACEHOLDER_TEXT: &str = "Type something...";

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE_EM: f64 = 0.55;

/// Kind of dashed outline drawn around an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineKind {
    Hovered,
    Selected,
}

/// The image inside its clipping box.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    /// The image box; the image is clipped to it.
    pub frame: Rect,
    /// Data URI of the image.
    pub href: String,
    /// Percent point of the source aligned to the same point of the frame.
    pub pan: Point,
    pub zoom: f64,
}

impl ImageElement {
    /// Where the full source image lands for a source of the given pixel size.
    ///
    /// The image covers the frame, is aligned at the pan point, then scaled by `zoom` about the
    /// frame center. An unknown (zero) size stretches the image over the frame.
    pub fn placement(&self, source: Size) -> Rect {
        let frame = self.frame;
        let base = if source.width > 0.0 && source.height > 0.0 {
            let cover = (frame.width() / source.width).max(frame.height() / source.height);
            let drawn = Size::new(source.width * cover, source.height * cover);
            let origin = Point::new(
                frame.x0 + (frame.width() - drawn.width) * self.pan.x / 100.0,
                frame.y0 + (frame.height() - drawn.height) * self.pan.y / 100.0,
            );
            Rect::from_origin_size(origin, drawn)
        } else {
            frame
        };
        let center = frame.center().to_vec2();
        let zoom = Affine::translate(center) * Affine::scale(self.zoom) * Affine::translate(-center);
        zoom.transform_rect_bbox(base)
    }
}

/// A text layer laid out into lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub layer_id: LayerId,
    /// Box including padding.
    pub bounds: Rect,
    pub lines: Vec<String>,
    pub is_placeholder: bool,
    pub font_family: String,
    /// Pixel size after scaling.
    pub font_size: f64,
    /// Multiple of the font size.
    pub line_height: f64,
    /// Pixels after scaling.
    pub letter_spacing: f64,
    pub color: Color,
    pub background: Option<Color>,
    /// Horizontal and vertical padding inside `bounds`.
    pub padding: Vec2,
    pub corner_radius: f64,
    pub align: TextAlign,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextElement {
    /// Area the lines are laid out in.
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x0 + self.padding.x,
            self.bounds.y0 + self.padding.y,
            self.bounds.x1 - self.padding.x,
            self.bounds.y1 - self.padding.y,
        )
    }

    /// Distance between baselines.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

/// One drawable item.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Background { rect: Rect, color: Color },
    Image(ImageElement),
    /// Full-slide tint. `opacity` is a fraction.
    Overlay { rect: Rect, color: Color, opacity: f64 },
    Text(TextElement),
    Outline { rect: Rect, kind: OutlineKind, color: Color },
    WidthHandle { layer_id: LayerId, rect: Rect },
    /// Only drawn while the image box is hovered, but always hit-testable.
    ImageResizeHandle { rect: Rect, visible: bool },
    SafeZone { rect: Rect },
}

/// A rendered slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Canvas size in pixels.
    pub size: Size,
    /// Pixels per design unit.
    pub scale: f64,
    /// Bottom to top.
    pub elements: Vec<Element>,
}

impl Composition {
    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }

    /// Topmost interactive target under `point`, or `None` outside the canvas.
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        // Width handles sit above everything and may poke out past the canvas edge.
        for element in self.elements.iter().rev() {
            if let Element::WidthHandle { layer_id, rect } = element {
                if rect.contains(point) {
                    return Some(HitTarget::TextWidthHandle(layer_id.clone()));
                }
            }
        }
        if !self.bounds().contains(point) {
            return None;
        }
        for element in self.elements.iter().rev() {
            match element {
                Element::Text(text) if text.bounds.contains(point) => {
                    return Some(HitTarget::TextLayer(text.layer_id.clone()));
                }
                Element::ImageResizeHandle { rect, .. } if rect.contains(point) => {
                    return Some(HitTarget::ImageResizeHandle);
                }
                Element::Image(image) if image.frame.contains(point) => {
                    return Some(HitTarget::ImageBox);
                }
                _ => {}
            }
        }
        Some(HitTarget::Background)
    }

    pub fn text(&self, layer_id: &str) -> Option<&TextElement> {
        self.elements.iter().find_map(|e| match e {
            Element::Text(text) if text.layer_id == layer_id => Some(text),
            _ => None,
        })
    }

    pub fn image(&self) -> Option<&ImageElement> {
        self.elements.iter().find_map(|e| match e {
            Element::Image(image) => Some(image),
            _ => None,
        })
    }
}

/// Break `content` into lines that fit `max_width` pixels.
///
/// Explicit newlines are kept. Words wider than the line are split by character. Glyph widths
/// are estimated, not measured.
pub fn wrap_lines(content: &str, max_width: f64, font_size: f64, letter_spacing: f64) -> Vec<String> {
    let advance = (font_size * GLYPH_ADVANCE_EM + letter_spacing).max(0.1);
    let max_chars = ((max_width / advance).floor() as usize).max(1);

    let mut lines = Vec::new();
    for paragraph in content.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in paragraph.split(' ') {
            let word_len = word.chars().count();
            let needed = if line_len == 0 { word_len } else { line_len + 1 + word_len };
            if needed <= max_chars {
                if line_len > 0 {
                    line.push(' ');
                }
                line.push_str(word);
                line_len = needed;
                continue;
            }
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars).peekable();
            while let Some(chunk) = chunks.next() {
                if chunks.peek().is_some() {
                    lines.push(chunk.iter().collect());
                } else {
                    line = chunk.iter().collect();
                    line_len = chunk.len();
                }
            }
        }
        lines.push(line);
    }
    lines
}
