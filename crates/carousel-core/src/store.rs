//! The open project's editing state.
//!
//! [`Editor`] owns the slide list of the project being edited, which slide is active and which
//! text layer is selected. Every mutation builds the changed slide (or layer) as a new value and
//! swaps it in while holding `&mut self`, so nothing ever observes a half-applied edit.

use crate::interaction::{DragKind, GeometryUpdate, HitTarget, InteractionController};
use crate::model::{
    FontLink, FontRegistry, LayerEdit, LayerId, LayerRole, Project, Slide, SlideEdit, TextLayer,
    custom_family_value, to_data_uri,
};
use kurbo::{Point, Size};

/// Name given to a brand-new project.
pub const NEW_PROJECT_NAME: &str = "New Carousel";

/// How slides are laid out in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// One slide, editable.
    #[default]
    Single,
    /// All slides side by side, read-only.
    Grid,
}

/// Editing state for the open project.
#[derive(Debug, Clone)]
pub struct Editor {
    project_id: Option<String>,
    name: String,
    slides: Vec<Slide>,
    active: usize,
    selected_layer: Option<LayerId>,
    view_mode: ViewMode,
    show_guides: bool,
    interaction: InteractionController,
    fonts: FontRegistry,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// An unsaved editor with one default slide and no project id yet.
    pub fn new() -> Self {
        Self {
            project_id: None,
            name: NEW_PROJECT_NAME.to_string(),
            slides: vec![Slide::new()],
            active: 0,
            selected_layer: None,
            view_mode: ViewMode::Single,
            show_guides: true,
            interaction: InteractionController::new(),
            fonts: FontRegistry::new(),
        }
    }

    /// Start a new project with a freshly minted id.
    pub fn new_project() -> Self {
        Self {
            project_id: Some(Project::mint_id()),
            ..Self::new()
        }
    }

    /// Open a saved project. An empty slide list is replaced by one default slide.
    pub fn open(project: &Project) -> Self {
        let slides = if project.slides.is_empty() {
            log::warn!("Project {} has no slides; starting with a default slide", project.id);
            vec![Slide::new()]
        } else {
            project.slides.clone()
        };
        Self {
            project_id: Some(project.id.clone()),
            name: project.name.clone(),
            slides,
            ..Self::new()
        }
    }

    /// Snapshot the editor as a project stamped with `last_modified`.
    ///
    /// Mints and keeps a project id if the editor did not have one yet.
    pub fn to_project(&mut self, last_modified: i64) -> Project {
        let id = self.project_id.get_or_insert_with(Project::mint_id).clone();
        Project {
            id,
            name: self.name.clone(),
            last_modified,
            slides: self.slides.clone(),
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_slide(&self) -> &Slide {
        &self.slides[self.active]
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Whether the safe-zone guide is shown.
    pub fn show_guides(&self) -> bool {
        self.show_guides
    }

    pub fn set_show_guides(&mut self, show: bool) {
        self.show_guides = show;
    }

    /// The selected layer id, if any.
    pub fn selected_layer_id(&self) -> Option<&str> {
        self.selected_layer.as_deref()
    }

    /// The selected layer, if it is on the active slide.
    pub fn selected_layer(&self) -> Option<&TextLayer> {
        self.selected_layer.as_deref().and_then(|id| self.active_slide().layer(id))
    }

    pub fn select_layer(&mut self, id: Option<LayerId>) {
        self.selected_layer = id;
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    // --- Slides ---

    /// Make slide `index` active. Out-of-range indices are ignored.
    pub fn select_slide(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn next_slide(&mut self) -> bool {
        self.select_slide(self.active + 1)
    }

    pub fn previous_slide(&mut self) -> bool {
        match self.active.checked_sub(1) {
            Some(index) => self.select_slide(index),
            None => false,
        }
    }

    /// Append a default slide that inherits the active slide's background, and activate it.
    pub fn add_slide(&mut self) -> &Slide {
        let mut slide = Slide::new();
        slide.background_color = self.active_slide().background_color.clone();
        self.slides.push(slide);
        self.active = self.slides.len() - 1;
        &self.slides[self.active]
    }

    /// Insert a copy of slide `index` right after it and activate the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> Option<&Slide> {
        let copy = self.slides.get(index)?.duplicate();
        self.slides.insert(index + 1, copy);
        self.active = index + 1;
        Some(&self.slides[self.active])
    }

    /// Remove slide `index`. The last remaining slide cannot be removed.
    pub fn remove_slide(&mut self, index: usize) -> bool {
        if self.slides.len() <= 1 || index >= self.slides.len() {
            return false;
        }
        self.slides.remove(index);
        if self.active >= self.slides.len() {
            self.active = self.slides.len() - 1;
        }
        true
    }

    /// Apply a field edit to the active slide.
    pub fn update_slide(&mut self, edit: SlideEdit) {
        let next = self.active_slide().with_edit(edit);
        self.slides[self.active] = next;
    }

    /// Embed image bytes on the active slide. Returns `false` for unsupported data.
    pub fn set_image(&mut self, data: &[u8]) -> bool {
        match to_data_uri(data) {
            Some(uri) => {
                self.update_slide(SlideEdit::ImageUrl(uri));
                true
            }
            None => {
                log::warn!("Rejected image upload: unrecognized format ({} bytes)", data.len());
                false
            }
        }
    }

    pub fn clear_image(&mut self) {
        self.update_slide(SlideEdit::ImageUrl(String::new()));
    }

    // --- Text layers ---

    /// Add a layer to the active slide and select it.
    pub fn add_text_layer(&mut self, role: LayerRole) -> LayerId {
        let layer = TextLayer::new(role);
        let id = layer.id.clone();
        let mut next = self.active_slide().clone();
        next.text_layers.push(layer);
        self.slides[self.active] = next;
        self.selected_layer = Some(id.clone());
        id
    }

    /// Remove a layer from the active slide. Clears the selection if it pointed at it.
    pub fn remove_text_layer(&mut self, id: &str) -> bool {
        if self.active_slide().layer_index(id).is_none() {
            return false;
        }
        let mut next = self.active_slide().clone();
        next.text_layers.retain(|l| l.id != id);
        self.slides[self.active] = next;
        if self.selected_layer.as_deref() == Some(id) {
            self.selected_layer = None;
        }
        true
    }

    /// Apply a field edit to a layer on the active slide.
    pub fn update_text_layer(&mut self, id: &str, edit: LayerEdit) -> bool {
        let Some(index) = self.active_slide().layer_index(id) else {
            return false;
        };
        let layer = self.active_slide().text_layers[index].with_edit(edit);
        let mut next = self.active_slide().clone();
        next.text_layers[index] = layer;
        self.slides[self.active] = next;
        true
    }

    /// Switch the selected layer to a custom web font.
    ///
    /// Returns the stylesheet link to inject, if this family was not loaded before.
    pub fn apply_custom_font(&mut self, name: &str) -> Option<FontLink> {
        let name = name.trim();
        let id = self.selected_layer()?.id.clone();
        if name.is_empty() {
            return None;
        }
        let link = self.fonts.request(name);
        self.update_text_layer(&id, LayerEdit::FontFamily(custom_family_value(name)));
        link
    }

    // --- Pointer ---

    /// Handle a pointer press on `target` at `position` (screen pixels).
    ///
    /// Pressing a layer selects it; pressing empty canvas clears the selection. Returns whether
    /// a drag started. Nothing happens outside single-slide view.
    pub fn pointer_down(&mut self, target: HitTarget, position: Point) -> bool {
        if self.view_mode != ViewMode::Single {
            return false;
        }
        if let HitTarget::TextLayer(id) = &target {
            self.selected_layer = Some(id.clone());
        }
        let Some((kind, layer)) = DragKind::for_target(&target) else {
            self.selected_layer = None;
            return false;
        };
        let slide = &self.slides[self.active];
        self.interaction.begin(kind, layer, position, slide)
    }

    /// Handle pointer movement. `canvas` is the rendered canvas size, if it has been laid out.
    ///
    /// Returns whether anything changed.
    pub fn pointer_move(&mut self, position: Point, canvas: Option<Size>) -> bool {
        match self.interaction.update(position, canvas) {
            Some(update) => self.apply_geometry(update),
            None => false,
        }
    }

    /// Handle a pointer release anywhere.
    pub fn pointer_up(&mut self) {
        self.interaction.end();
    }

    /// Write drag geometry onto the active slide.
    pub fn apply_geometry(&mut self, update: GeometryUpdate) -> bool {
        match update {
            GeometryUpdate::TextPosition { layer_id, x, y } => {
                let Some(index) = self.active_slide().layer_index(&layer_id) else {
                    return false;
                };
                let mut next = self.active_slide().clone();
                next.text_layers[index].x = x;
                next.text_layers[index].y = y;
                self.slides[self.active] = next;
                true
            }
            GeometryUpdate::TextWidth { layer_id, w } => {
                self.update_text_layer(&layer_id, LayerEdit::Width(w))
            }
            GeometryUpdate::ImageBoxOrigin { x, y } => {
                self.update_slide(SlideEdit::ImageBoxOrigin(Point::new(x, y)));
                true
            }
            GeometryUpdate::ImageBoxSize { w, h } => {
                self.update_slide(SlideEdit::ImageBoxSize(Size::new(w, h)));
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Template, TextAlign};

    #[test]
    fn test_new_editor_has_one_slide() {
        let editor = Editor::new();
        assert_eq!(editor.slides().len(), 1);
        assert_eq!(editor.active_index(), 0);
        assert!(editor.project_id().is_none());
        assert!(Editor::new_project().project_id().is_some());
    }

    #[test]
    fn test_add_slide_inherits_background() {
        let mut editor = Editor::new();
        editor.update_slide(SlideEdit::BackgroundColor("#112233".into()));
        editor.add_slide();
        assert_eq!(editor.slides().len(), 2);
        assert_eq!(editor.active_index(), 1);
        assert_eq!(editor.active_slide().background_color, "#112233");
    }

    #[test]
    fn test_duplicate_slide() {
        let mut editor = Editor::new();
        editor.update_slide(SlideEdit::OverlayEnabled(true));
        editor.add_slide();
        let original = editor.slides()[0].clone();

        let copy = editor.duplicate_slide(0).unwrap().clone();
        assert_eq!(editor.slides().len(), 3);
        assert_eq!(editor.active_index(), 1);
        assert_ne!(copy.id, original.id);
        assert!(copy.overlay_enabled);
        for (a, b) in original.text_layers.iter().zip(&copy.text_layers) {
            assert_ne!(a.id, b.id);
            assert_eq!(TextLayer { id: b.id.clone(), ..a.clone() }, *b);
        }

        // Editing the copy leaves the original alone.
        let layer_id = copy.text_layers[0].id.clone();
        editor.update_text_layer(&layer_id, LayerEdit::Content("Changed".into()));
        assert_eq!(editor.slides()[0], original);
        assert_eq!(editor.slides()[1].text_layers[0].content, "Changed");
    }

    #[test]
    fn test_duplicate_out_of_range() {
        let mut editor = Editor::new();
        assert!(editor.duplicate_slide(4).is_none());
        assert_eq!(editor.slides().len(), 1);
    }

    #[test]
    fn test_remove_last_slide_is_rejected() {
        let mut editor = Editor::new();
        let before = editor.slides()[0].clone();
        assert!(!editor.remove_slide(0));
        assert_eq!(editor.slides().len(), 1);
        assert_eq!(editor.slides()[0], before);
    }

    #[test]
    fn test_remove_clamps_active() {
        let mut editor = Editor::new();
        editor.add_slide();
        editor.add_slide();
        assert_eq!(editor.active_index(), 2);
        assert!(editor.remove_slide(2));
        assert_eq!(editor.active_index(), 1);
        assert!(editor.remove_slide(0));
        assert_eq!(editor.active_index(), 0);
    }

    #[test]
    fn test_navigation() {
        let mut editor = Editor::new();
        editor.add_slide();
        assert!(!editor.next_slide());
        assert!(editor.previous_slide());
        assert_eq!(editor.active_index(), 0);
        assert!(!editor.previous_slide());
        assert!(editor.next_slide());
        assert!(!editor.select_slide(9));
    }

    #[test]
    fn test_add_subtitle_layer() {
        let mut editor = Editor::new_project();
        let id = editor.add_text_layer(LayerRole::Subtitle);
        let layer = editor.selected_layer().unwrap();
        assert_eq!(layer.id, id);
        assert_eq!(layer.content, "Catchy Subtitle");
        assert_eq!(layer.font_size, 20.0);
        assert_eq!(layer.align, TextAlign::Left);
        assert!(!layer.is_bold);
        assert_eq!(editor.active_slide().text_layers.len(), 3);
    }

    #[test]
    fn test_remove_layer_clears_selection() {
        let mut editor = Editor::new();
        let id = editor.add_text_layer(LayerRole::Caption);
        assert!(editor.remove_text_layer(&id));
        assert!(editor.selected_layer_id().is_none());
        assert!(!editor.remove_text_layer(&id));
    }

    #[test]
    fn test_update_layer_clamps_font_size() {
        let mut editor = Editor::new();
        let id = editor.active_slide().text_layers[0].id.clone();
        assert!(editor.update_text_layer(&id, LayerEdit::FontSize(999.0)));
        assert_eq!(editor.active_slide().text_layers[0].font_size, 200.0);
        assert!(!editor.update_text_layer("missing", LayerEdit::Bold(true)));
    }

    #[test]
    fn test_template_sets_box_once() {
        let mut editor = Editor::new();
        editor.update_slide(SlideEdit::Template(Template::ImageBottom));
        let slide = editor.active_slide();
        assert_eq!((slide.img_box_x, slide.img_box_y, slide.img_box_w, slide.img_box_h), (0.0, 50.0, 100.0, 50.0));

        editor.update_slide(SlideEdit::ImageBoxOrigin(Point::new(12.0, 30.0)));
        let slide = editor.active_slide();
        assert_eq!(slide.template, Template::ImageBottom);
        assert_eq!((slide.img_box_x, slide.img_box_y), (12.0, 30.0));
    }

    #[test]
    fn test_set_image() {
        let mut editor = Editor::new();
        assert!(!editor.set_image(b"not an image"));
        assert!(editor.set_image(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]));
        assert!(editor.active_slide().image_url.starts_with("data:image/png;base64,"));
        editor.clear_image();
        assert!(!editor.active_slide().has_image());
    }

    #[test]
    fn test_custom_font() {
        let mut editor = Editor::new();
        assert!(editor.apply_custom_font("Oswald").is_none());

        let id = editor.active_slide().text_layers[0].id.clone();
        editor.select_layer(Some(id));
        let link = editor.apply_custom_font("Oswald").unwrap();
        assert_eq!(link.element_id, "font-oswald");
        assert_eq!(editor.selected_layer().unwrap().font_family, "'Oswald', sans-serif");
        assert!(editor.apply_custom_font("Oswald").is_none());
    }

    #[test]
    fn test_drag_text_layer() {
        let mut editor = Editor::new();
        let id = editor.active_slide().text_layers[0].id.clone();

        assert!(editor.pointer_down(HitTarget::TextLayer(id.clone()), Point::new(50.0, 60.0)));
        assert_eq!(editor.selected_layer_id(), Some(id.as_str()));

        let canvas = Some(Size::new(400.0, 500.0));
        assert!(editor.pointer_move(Point::new(90.0, 110.0), canvas));
        let layer = editor.active_slide().layer(&id).unwrap();
        assert_eq!((layer.x, layer.y), (20.0, 20.0));

        editor.pointer_up();
        assert!(!editor.pointer_move(Point::new(300.0, 300.0), canvas));
        let layer = editor.active_slide().layer(&id).unwrap();
        assert_eq!((layer.x, layer.y), (20.0, 20.0));
    }

    #[test]
    fn test_drag_without_layout_is_noop() {
        let mut editor = Editor::new();
        let id = editor.active_slide().text_layers[0].id.clone();
        editor.pointer_down(HitTarget::TextLayer(id.clone()), Point::ZERO);
        let before = editor.active_slide().clone();
        assert!(!editor.pointer_move(Point::new(40.0, 40.0), None));
        assert_eq!(*editor.active_slide(), before);
    }

    #[test]
    fn test_resize_image_box() {
        let mut editor = Editor::new();
        assert!(editor.pointer_down(HitTarget::ImageResizeHandle, Point::new(100.0, 100.0)));
        editor.pointer_move(Point::new(-1000.0, -1000.0), Some(Size::new(320.0, 400.0)));
        let slide = editor.active_slide();
        assert_eq!((slide.img_box_w, slide.img_box_h), (10.0, 10.0));
        editor.pointer_up();
        assert!(!editor.interaction().is_dragging());
    }

    #[test]
    fn test_background_press_clears_selection() {
        let mut editor = Editor::new();
        let id = editor.add_text_layer(LayerRole::Body);
        assert_eq!(editor.selected_layer_id(), Some(id.as_str()));
        assert!(!editor.pointer_down(HitTarget::Background, Point::ZERO));
        assert!(editor.selected_layer_id().is_none());
    }

    #[test]
    fn test_grid_view_is_read_only() {
        let mut editor = Editor::new();
        editor.set_view_mode(ViewMode::Grid);
        assert!(!editor.pointer_down(HitTarget::ImageBox, Point::ZERO));
        assert!(!editor.interaction().is_dragging());
    }

    #[test]
    fn test_to_project_mints_id_once() {
        let mut editor = Editor::new();
        let first = editor.to_project(1);
        let second = editor.to_project(2);
        assert_eq!(first.id, second.id);
        assert_eq!(second.last_modified, 2);
        assert_eq!(editor.project_id(), Some(first.id.as_str()));
    }

    #[test]
    fn test_open_project() {
        let mut source = Editor::new_project();
        source.set_name("Launch");
        source.add_slide();
        let project = source.to_project(10);

        let editor = Editor::open(&project);
        assert_eq!(editor.name(), "Launch");
        assert_eq!(editor.slides(), project.slides.as_slice());
        assert_eq!(editor.active_index(), 0);
    }
}
