//! Slides and layout templates.

use super::layer::{LayerRole, TextLayer, clamp_to, new_id};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Identifier of a slide.
pub type SlideId = String;

/// Minimum image box dimension (percent).
pub const MIN_IMAGE_BOX: f64 = 10.0;
/// Allowed zoom range for the image crop.
pub const ZOOM_RANGE: (f64, f64) = (1.0, 3.0);
/// Allowed range for pan and overlay opacity (percent).
pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Named layout preset. Applying one rewrites the image box once; it is not enforced afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    #[default]
    TextOnly,
    ImageTop,
    ImageBottom,
    Split,
}

impl Template {
    /// All templates, in picker order.
    pub fn all() -> &'static [Template] {
        &[
            Template::TextOnly,
            Template::ImageBottom,
            Template::ImageTop,
            Template::Split,
        ]
    }

    /// The wire name (`text-only`, `image-top`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Template::TextOnly => "text-only",
            Template::ImageTop => "image-top",
            Template::ImageBottom => "image-bottom",
            Template::Split => "split",
        }
    }

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.name() == name)
    }

    /// Image box preset as `(x, y, w, h)` percentages. `TextOnly` leaves the box alone.
    pub fn image_box_preset(&self) -> Option<Rect> {
        match self {
            Template::TextOnly => None,
            Template::ImageTop => Some(Rect::new(0.0, 0.0, 100.0, 50.0)),
            Template::ImageBottom => Some(Rect::new(0.0, 50.0, 100.0, 100.0)),
            Template::Split => Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
        }
    }
}

/// One page of the carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: SlideId,
    /// Z-ordered back to front.
    pub text_layers: Vec<TextLayer>,
    pub background_color: String,
    pub overlay_enabled: bool,
    pub overlay_color: String,
    /// Percent, 0..=100.
    pub overlay_opacity: f64,
    /// Data URI, or empty for no image.
    pub image_url: String,
    pub img_box_x: f64,
    pub img_box_y: f64,
    pub img_box_w: f64,
    pub img_box_h: f64,
    pub img_zoom: f64,
    pub img_pan_x: f64,
    pub img_pan_y: f64,
    pub template: Template,
}

impl Default for Slide {
    fn default() -> Self {
        Self::new()
    }
}

impl Slide {
    /// A fresh slide: title and body layers on a warm neutral background.
    pub fn new() -> Self {
        Self {
            id: new_id(),
            text_layers: vec![TextLayer::new(LayerRole::Title), TextLayer::new(LayerRole::Body)],
            background_color: "#F7F3E8".to_string(),
            overlay_enabled: false,
            overlay_color: "#000000".to_string(),
            overlay_opacity: 20.0,
            image_url: String::new(),
            img_box_x: 0.0,
            img_box_y: 0.0,
            img_box_w: 100.0,
            img_box_h: 50.0,
            img_zoom: 1.0,
            img_pan_x: 50.0,
            img_pan_y: 50.0,
            template: Template::TextOnly,
        }
    }

    /// Deep copy with a new slide id and new ids for every layer.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            text_layers: self.text_layers.iter().map(TextLayer::duplicate).collect(),
            ..self.clone()
        }
    }

    /// Whether an image is set.
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    /// Find a layer by id.
    pub fn layer(&self, id: &str) -> Option<&TextLayer> {
        self.text_layers.iter().find(|l| l.id == id)
    }

    /// Index of a layer by id.
    pub fn layer_index(&self, id: &str) -> Option<usize> {
        self.text_layers.iter().position(|l| l.id == id)
    }

    /// Image box in percent space.
    pub fn image_box(&self) -> Rect {
        Rect::from_origin_size(self.image_box_origin(), self.image_box_size())
    }

    pub fn image_box_origin(&self) -> Point {
        Point::new(self.img_box_x, self.img_box_y)
    }

    pub fn image_box_size(&self) -> Size {
        Size::new(self.img_box_w, self.img_box_h)
    }

    fn set_image_box(&mut self, rect: Rect) {
        self.img_box_x = rect.x0;
        self.img_box_y = rect.y0;
        self.img_box_w = rect.width();
        self.img_box_h = rect.height();
    }

    /// Return a copy with `edit` applied.
    ///
    /// Setting the template also stamps its image box preset onto the slide.
    pub fn with_edit(&self, edit: SlideEdit) -> Self {
        let mut next = self.clone();
        match edit {
            SlideEdit::BackgroundColor(v) => next.background_color = v,
            SlideEdit::OverlayEnabled(v) => next.overlay_enabled = v,
            SlideEdit::OverlayColor(v) => next.overlay_color = v,
            SlideEdit::OverlayOpacity(v) => next.overlay_opacity = clamp_to(v, PERCENT_RANGE),
            SlideEdit::ImageUrl(v) => next.image_url = v,
            SlideEdit::ImageZoom(v) => next.img_zoom = clamp_to(v, ZOOM_RANGE),
            SlideEdit::ImagePanX(v) => next.img_pan_x = clamp_to(v, PERCENT_RANGE),
            SlideEdit::ImagePanY(v) => next.img_pan_y = clamp_to(v, PERCENT_RANGE),
            SlideEdit::ImageBoxOrigin(p) => {
                next.img_box_x = p.x;
                next.img_box_y = p.y;
            }
            SlideEdit::ImageBoxSize(s) => {
                next.img_box_w = s.width.max(MIN_IMAGE_BOX);
                next.img_box_h = s.height.max(MIN_IMAGE_BOX);
            }
            SlideEdit::Template(template) => {
                if let Some(preset) = template.image_box_preset() {
                    next.set_image_box(preset);
                }
                next.template = template;
            }
        }
        next
    }
}

/// A single-field change to a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideEdit {
    BackgroundColor(String),
    OverlayEnabled(bool),
    OverlayColor(String),
    OverlayOpacity(f64),
    ImageUrl(String),
    ImageZoom(f64),
    ImagePanX(f64),
    ImagePanY(f64),
    ImageBoxOrigin(Point),
    ImageBoxSize(Size),
    Template(Template),
}
