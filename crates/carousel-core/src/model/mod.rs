//! Slide and layer data model.

pub mod color;
mod fonts;
mod image;
mod layer;
mod project;
mod slide;

pub use fonts::{FONT_PRESETS, FontLink, FontPreset, FontRegistry, custom_family_value};
pub use image::{ImageFormat, decode_data_uri, to_data_uri};
pub use layer::{
    FONT_SIZE_RANGE, LETTER_SPACING_RANGE, LINE_HEIGHT_RANGE, LayerEdit, LayerId, LayerRole,
    POSITION_RANGE, TextAlign, TextLayer, WIDTH_RANGE, new_id,
};
pub use project::{Project, now_millis};
pub use slide::{MIN_IMAGE_BOX, PERCENT_RANGE, Slide, SlideEdit, SlideId, Template, ZOOM_RANGE};
