//! SVG serialization of a [`Composition`].

use crate::composition::{Composition, Element, ImageElement, OutlineKind, TextElement};
use carousel_core::model::TextAlign;
use carousel_core::model::color::to_hex;
use kurbo::{Rect, Size};
use peniko::Color;
use std::fmt::Write;

/// Ascent as a fraction of the font size, used to place baselines.
const ASCENT_EM: f64 = 0.8;
const PLACEHOLDER_OPACITY: f64 = 0.5;
const HANDLE_COLOR: &str = "#22D3EE";
const RESIZE_HANDLE_STROKE: &str = "#9333EA";

/// Serialize `composition` as a standalone SVG document.
///
/// `image_size` is the pixel size of the slide image source, if known; it drives the cover crop.
pub fn to_svg(composition: &Composition, image_size: Option<Size>) -> String {
    let Size { width, height } = composition.size;
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(width),
        h = num(height),
    );

    for (index, element) in composition.elements.iter().enumerate() {
        match element {
            Element::Background { rect, color } => write_rect(&mut out, *rect, 0.0, &fill(*color, 1.0)),
            Element::Image(image) => write_image(&mut out, image, index, image_size),
            Element::Overlay { rect, color, opacity } => write_rect(&mut out, *rect, 0.0, &fill(*color, *opacity)),
            Element::Text(text) => write_text(&mut out, text),
            Element::Outline { rect, kind, color } => {
                let width = match kind {
                    OutlineKind::Hovered => 1.0,
                    OutlineKind::Selected => 2.0,
                };
                let style = format!(
                    r#"fill="none" {} stroke-width="{}" stroke-dasharray="4 4""#,
                    stroke(*color, 1.0),
                    num(width)
                );
                write_rect(&mut out, *rect, 0.0, &style);
            }
            Element::WidthHandle { rect, .. } => {
                write_rect(&mut out, *rect, 3.0, &format!(r#"fill="{}""#, HANDLE_COLOR));
            }
            Element::ImageResizeHandle { rect, visible } => {
                if *visible {
                    let style = format!(r##"fill="#FFFFFF" stroke="{}" stroke-width="2""##, RESIZE_HANDLE_STROKE);
                    write_rect(&mut out, *rect, 4.0, &style);
                }
            }
            Element::SafeZone { rect } => {
                let style = format!(
                    r#"fill="none" stroke="{}" stroke-opacity="0.3" stroke-width="2" stroke-dasharray="6 4""#,
                    HANDLE_COLOR
                );
                write_rect(&mut out, *rect, 2.0, &style);
            }
        }
    }

    out.push_str("</svg>\n");
    out
}

fn write_rect(out: &mut String, rect: Rect, radius: f64, style: &str) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        num(rect.x0),
        num(rect.y0),
        num(rect.width()),
        num(rect.height())
    );
    if radius > 0.0 {
        let _ = write!(out, r#" rx="{}""#, num(radius));
    }
    let _ = writeln!(out, " {}/>", style);
}

fn write_image(out: &mut String, image: &ImageElement, index: usize, source: Option<Size>) {
    let clip_id = format!("image-clip-{}", index);
    let placed = image.placement(source.unwrap_or(Size::ZERO));
    let _ = writeln!(out, r#"<defs><clipPath id="{}">"#, clip_id);
    write_rect(out, image.frame, 0.0, "");
    let _ = writeln!(out, "</clipPath></defs>");
    let _ = writeln!(
        out,
        r#"<g clip-path="url(#{})"><image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"/></g>"#,
        clip_id,
        num(placed.x0),
        num(placed.y0),
        num(placed.width()),
        num(placed.height()),
        escape(&image.href)
    );
}

fn write_text(out: &mut String, text: &TextElement) {
    if let Some(background) = text.background {
        write_rect(out, text.bounds, text.corner_radius, &fill(background, 1.0));
    }

    let content = text.content_rect();
    let (anchor, x) = match text.align {
        TextAlign::Left => ("start", content.x0),
        TextAlign::Center => ("middle", content.center().x),
        TextAlign::Right => ("end", content.x1),
    };
    let opacity = if text.is_placeholder { PLACEHOLDER_OPACITY } else { 1.0 };
    let advance = text.line_advance();
    let half_leading = (advance - text.font_size) / 2.0;

    let mut attrs = format!(
        r#"font-family="{}" font-size="{}" text-anchor="{}" {}"#,
        escape(&text.font_family),
        num(text.font_size),
        anchor,
        fill(text.color, opacity)
    );
    if text.bold {
        attrs.push_str(r#" font-weight="bold""#);
    }
    if text.italic {
        attrs.push_str(r#" font-style="italic""#);
    }
    if text.underline {
        attrs.push_str(r#" text-decoration="underline""#);
    }
    if text.letter_spacing != 0.0 {
        let _ = write!(attrs, r#" letter-spacing="{}""#, num(text.letter_spacing));
    }

    let _ = writeln!(out, r#"<text {} xml:space="preserve">"#, attrs);
    for (i, line) in text.lines.iter().enumerate() {
        let baseline = content.y0 + i as f64 * advance + half_leading + text.font_size * ASCENT_EM;
        let _ = writeln!(
            out,
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            num(x),
            num(baseline),
            escape(line)
        );
    }
    out.push_str("</text>\n");
}

fn fill(color: Color, opacity: f64) -> String {
    let (hex, alpha) = hex_alpha(color);
    format!(r#"fill="{}" fill-opacity="{}""#, hex, num(alpha * opacity))
}

fn stroke(color: Color, opacity: f64) -> String {
    let (hex, alpha) = hex_alpha(color);
    format!(r#"stroke="{}" stroke-opacity="{}""#, hex, num(alpha * opacity))
}

fn hex_alpha(color: Color) -> (String, f64) {
    (to_hex(color), f64::from(color.to_rgba8().a) / 255.0)
}

/// Format a number for an attribute, dropping trailing zeros.
fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

/// Escape text for XML content and double-quoted attributes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
