//! Slide to [`Composition`] rendering.

use crate::composition::{
    BASE_HEIGHT, BASE_WIDTH, Composition, Element, ImageElement, OutlineKind, PLACEHOLDER_TEXT,
    TextElement, wrap_lines,
};
use carousel_core::interaction::HitTarget;
use carousel_core::{Editor, ViewMode};
use carousel_core::model::color::{is_transparent, parse_css_color};
use carousel_core::model::{LayerId, Slide, TextLayer};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

/// Editor canvas scale.
pub const EDITOR_SCALE: f64 = 1.2;
/// Grid view scale.
pub const GRID_SCALE: f64 = 0.7;
/// Export scale: 320x400 becomes 1080x1350.
pub const EXPORT_SCALE: f64 = 3.375;

/// Text background padding in design units (horizontal, vertical).
const TEXT_PADDING: Vec2 = Vec2::new(8.0, 4.0);
const TEXT_CORNER_RADIUS: f64 = 4.0;
/// Text boxes never get narrower than this, in design units.
const MIN_TEXT_WIDTH: f64 = 20.0;
/// Handles keep a fixed on-screen size.
const WIDTH_HANDLE_SIZE: Size = Size::new(12.0, 24.0);
const WIDTH_HANDLE_OVERHANG: f64 = 8.0;
const RESIZE_HANDLE_SIZE: f64 = 24.0;
/// Safe-zone inset as a fraction of each side.
const SAFE_ZONE_INSET: f64 = 0.1;

const FALLBACK_BACKGROUND: Color = Color::WHITE;
const FALLBACK_FOREGROUND: Color = Color::BLACK;
const IMAGE_OUTLINE_COLOR: Color = Color::from_rgba8(192, 132, 252, 255);
const TEXT_OUTLINE_COLOR: Color = Color::from_rgba8(34, 211, 238, 255);

/// Options for a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Pixels per design unit.
    pub scale: f64,
    /// Draw editor affordances and placeholders.
    pub editing: bool,
    pub show_safe_zone: bool,
    /// Draw only the background and image.
    pub thumbnail: bool,
    pub selected_layer: Option<LayerId>,
    pub hovered: Option<HitTarget>,
}

impl RenderOptions {
    /// Create options for a read-only render at `scale`.
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            editing: false,
            show_safe_zone: false,
            thumbnail: false,
            selected_layer: None,
            hovered: None,
        }
    }

    /// The interactive single-slide canvas.
    pub fn editor() -> Self {
        Self::new(EDITOR_SCALE).with_editing(true).with_safe_zone(true)
    }

    /// One cell of the grid view.
    pub fn grid() -> Self {
        Self::new(GRID_SCALE)
    }

    /// The view an editor is currently showing: its view mode, guides and selection.
    pub fn for_editor(editor: &Editor) -> Self {
        let options = match editor.view_mode() {
            ViewMode::Single => Self::editor(),
            ViewMode::Grid => Self::grid(),
        };
        options
            .with_safe_zone(editor.show_guides())
            .with_selected_layer(editor.selected_layer_id().map(str::to_string))
    }

    /// Full-resolution export.
    pub fn export() -> Self {
        Self::new(EXPORT_SCALE)
    }

    /// A filmstrip thumbnail `width` pixels wide.
    pub fn filmstrip(width: f64) -> Self {
        let mut options = Self::new(width / BASE_WIDTH);
        options.thumbnail = true;
        options
    }

    pub fn with_editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    pub fn with_safe_zone(mut self, show: bool) -> Self {
        self.show_safe_zone = show;
        self
    }

    pub fn with_selected_layer(mut self, id: Option<LayerId>) -> Self {
        self.selected_layer = id;
        self
    }

    /// Set the element under the pointer.
    pub fn with_hovered(mut self, target: Option<HitTarget>) -> Self {
        self.hovered = target;
        self
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> Size {
        Size::new(BASE_WIDTH * self.scale, BASE_HEIGHT * self.scale)
    }
}

/// Render a slide. Never mutates the slide and never fails; unparseable colors fall back.
pub fn render(slide: &Slide, options: &RenderOptions) -> Composition {
    let size = options.canvas_size();
    let canvas = size.to_rect();
    let mut elements = Vec::new();

    elements.push(Element::Background {
        rect: canvas,
        color: parse_css_color(&slide.background_color).unwrap_or(FALLBACK_BACKGROUND),
    });

    let image_hovered = options.editing
        && matches!(options.hovered, Some(HitTarget::ImageBox | HitTarget::ImageResizeHandle));
    let image_frame = percent_rect(slide.image_box(), size);
    if slide.has_image() {
        elements.push(Element::Image(ImageElement {
            frame: image_frame,
            href: slide.image_url.clone(),
            pan: Point::new(slide.img_pan_x, slide.img_pan_y),
            zoom: slide.img_zoom,
        }));
        if options.editing && !options.thumbnail {
            // Stacked with the image, below the overlay and every text layer.
            let corner = Point::new(image_frame.x1, image_frame.y1);
            elements.push(Element::ImageResizeHandle {
                rect: Rect::new(corner.x - RESIZE_HANDLE_SIZE, corner.y - RESIZE_HANDLE_SIZE, corner.x, corner.y),
                visible: image_hovered,
            });
        }
    }

    if options.thumbnail {
        return Composition { size, scale: options.scale, elements };
    }

    if slide.overlay_enabled {
        elements.push(Element::Overlay {
            rect: canvas,
            color: parse_css_color(&slide.overlay_color).unwrap_or(FALLBACK_FOREGROUND),
            opacity: slide.overlay_opacity / 100.0,
        });
    }

    for layer in &slide.text_layers {
        let Some(text) = layout_text(layer, size, options) else {
            continue;
        };
        let selected = options.editing && options.selected_layer.as_deref() == Some(layer.id.as_str());
        let hovered = options.editing
            && matches!(&options.hovered, Some(HitTarget::TextLayer(id)) if *id == layer.id);
        let bounds = text.bounds;
        elements.push(Element::Text(text));

        if selected {
            elements.push(Element::Outline { rect: bounds, kind: OutlineKind::Selected, color: TEXT_OUTLINE_COLOR });
            let handle_origin = Point::new(
                bounds.x1 + WIDTH_HANDLE_OVERHANG - WIDTH_HANDLE_SIZE.width,
                bounds.center().y - WIDTH_HANDLE_SIZE.height / 2.0,
            );
            elements.push(Element::WidthHandle {
                layer_id: layer.id.clone(),
                rect: Rect::from_origin_size(handle_origin, WIDTH_HANDLE_SIZE),
            });
        } else if hovered {
            elements.push(Element::Outline { rect: bounds, kind: OutlineKind::Hovered, color: TEXT_OUTLINE_COLOR });
        }
    }

    if slide.has_image() && image_hovered {
        elements.push(Element::Outline {
            rect: image_frame,
            kind: OutlineKind::Hovered,
            color: IMAGE_OUTLINE_COLOR,
        });
    }

    if options.editing && options.show_safe_zone {
        elements.push(Element::SafeZone {
            rect: Rect::new(
                size.width * SAFE_ZONE_INSET,
                size.height * SAFE_ZONE_INSET,
                size.width * (1.0 - SAFE_ZONE_INSET),
                size.height * (1.0 - SAFE_ZONE_INSET),
            ),
        });
    }

    Composition { size, scale: options.scale, elements }
}

/// Map a rect in slide percent to canvas pixels.
fn percent_rect(rect: Rect, size: Size) -> Rect {
    Rect::new(
        rect.x0 * size.width / 100.0,
        rect.y0 * size.height / 100.0,
        rect.x1 * size.width / 100.0,
        rect.y1 * size.height / 100.0,
    )
}

/// Lay out a text layer. Empty layers only take space while editing, as a placeholder.
fn layout_text(layer: &TextLayer, size: Size, options: &RenderOptions) -> Option<TextElement> {
    let scale = options.scale;
    let is_placeholder = layer.content.is_empty();
    if is_placeholder && !options.editing {
        return None;
    }
    let content = if is_placeholder { PLACEHOLDER_TEXT } else { layer.content.as_str() };

    let background = if is_transparent(&layer.background_color) {
        None
    } else {
        parse_css_color(&layer.background_color)
    };
    let padding = if background.is_some() { TEXT_PADDING * scale } else { Vec2::ZERO };

    let font_size = layer.font_size * scale;
    let letter_spacing = layer.letter_spacing * scale;
    let origin = Point::new(layer.x * size.width / 100.0, layer.y * size.height / 100.0);
    let width = (layer.w * size.width / 100.0).max(MIN_TEXT_WIDTH * scale);
    let lines = wrap_lines(content, width - 2.0 * padding.x, font_size, letter_spacing);
    let height = lines.len() as f64 * font_size * layer.line_height + 2.0 * padding.y;

    Some(TextElement {
        layer_id: layer.id.clone(),
        bounds: Rect::from_origin_size(origin, Size::new(width, height)),
        lines,
        is_placeholder,
        font_family: layer.font_family.clone(),
        font_size,
        line_height: layer.line_height,
        letter_spacing,
        color: parse_css_color(&layer.color).unwrap_or(FALLBACK_FOREGROUND),
        background,
        padding,
        corner_radius: if background.is_some() { TEXT_CORNER_RADIUS * scale } else { 0.0 },
        align: layer.align,
        bold: layer.is_bold,
        italic: layer.is_italic,
        underline: layer.is_underline,
    })
}
