//! Font presets and on-demand web font links.

use std::collections::HashSet;

/// A built-in font choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPreset {
    /// Label shown in the picker.
    pub name: &'static str,
    /// CSS `font-family` value stored on layers.
    pub family: &'static str,
}

/// Built-in fonts, in picker order.
pub const FONT_PRESETS: &[FontPreset] = &[
    FontPreset { name: "Elegant (Playfair)", family: "'Playfair Display', serif" },
    FontPreset { name: "Modern (Inter)", family: "'Inter', sans-serif" },
    FontPreset { name: "Bold (Montserrat)", family: "'Montserrat', sans-serif" },
    FontPreset { name: "Classic (Lora)", family: "'Lora', serif" },
    FontPreset { name: "Standard (Roboto)", family: "'Roboto', sans-serif" },
    FontPreset { name: "Handwritten (Dancing)", family: "'Dancing Script', cursive" },
];

const WEB_FONT_BASE: &str = "https://fonts.googleapis.com/css2";

/// A stylesheet link to inject for a custom font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontLink {
    /// Element id used to make injection idempotent.
    pub element_id: String,
    /// Stylesheet URL.
    pub href: String,
}

impl FontLink {
    /// Build the link for a family name such as `"Open Sans"`.
    pub fn for_family(name: &str) -> Self {
        let name = name.trim();
        let words: Vec<&str> = name.split_whitespace().collect();
        Self {
            element_id: format!("font-{}", words.join("-").to_lowercase()),
            href: format!("{}?family={}:wght@400;700&display=swap", WEB_FONT_BASE, words.join("+")),
        }
    }
}

/// CSS family value stored on a layer for a custom font.
pub fn custom_family_value(name: &str) -> String {
    format!("'{}', sans-serif", name.trim())
}

/// Tracks which custom font links have already been injected.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    injected: HashSet<String>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a custom font. Returns the link to inject the first time a family is seen,
    /// `None` when it was already injected or the name is blank.
    pub fn request(&mut self, name: &str) -> Option<FontLink> {
        if name.trim().is_empty() {
            return None;
        }
        let link = FontLink::for_family(name);
        if self.injected.insert(link.element_id.clone()) {
            log::info!("Loading web font '{}' from {}", name.trim(), link.href);
            Some(link)
        } else {
            None
        }
    }

    /// Whether a family has been injected.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.injected.contains(&FontLink::for_family(name).element_id)
    }
}
