//! Studio operations behind each subcommand.

use crate::config::StudioConfig;
use anyhow::{Context as _, anyhow, bail};
use carousel_core::model::{LayerEdit, LayerRole, Project, Template};
use carousel_core::{Editor, FileStore, ProjectLibrary, SAVE_DELAY, SaveController, SaveStatus, Session, SlideEdit};
use carousel_render::{
    DirectorySink, DownloadSink, ExportOutcome, ExportReport, Exporter, Rasterizer, RenderOptions, SvgRasterizer,
    SvgRasterizerLoader, render,
};
use pollster::block_on;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Signed-in session plus the project library over a file store.
pub struct Studio {
    config: StudioConfig,
    session: Session<FileStore>,
    library: ProjectLibrary<FileStore>,
}

impl Studio {
    pub fn open(config: StudioConfig) -> anyhow::Result<Self> {
        let store = Arc::new(
            FileStore::new(config.store_dir())
                .with_context(|| format!("open data directory '{}'", config.data_dir.display()))?,
        );
        let session = block_on(Session::restore(store.clone()));
        let library = block_on(ProjectLibrary::load(store));
        Ok(Self { config, session, library })
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn login(&mut self, email: &str) -> anyhow::Result<String> {
        let user = block_on(self.session.login(email)).context("save sign-in")?;
        Ok(user.email.clone())
    }

    pub fn logout(&mut self) -> anyhow::Result<()> {
        block_on(self.session.logout()).context("sign out")
    }

    pub fn whoami(&self) -> Option<&str> {
        self.session.user().map(|u| u.email.as_str())
    }

    pub fn projects(&self) -> &[Project] {
        self.library.list()
    }

    /// Create and save a project. Returns its id.
    pub fn create_project(&mut self, name: Option<&str>) -> anyhow::Result<String> {
        let mut editor = Editor::new_project();
        if let Some(name) = name {
            editor.set_name(name);
        }
        self.save(&mut editor)?;
        editor
            .project_id()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("project was saved without an id"))
    }

    pub fn delete_project(&mut self, id: &str) -> anyhow::Result<()> {
        if !block_on(self.library.delete(id)).context("delete project")? {
            bail!("No project with id '{}'", id);
        }
        Ok(())
    }

    pub fn rename_project(&mut self, id: &str, name: &str) -> anyhow::Result<()> {
        if name.trim().is_empty() {
            bail!("Project name cannot be blank");
        }
        self.edit(id, |editor| {
            editor.set_name(name.trim());
            Ok(())
        })
    }

    /// Append a slide, or duplicate slide `duplicate` (1-based). Returns the new slide count.
    pub fn add_slide(&mut self, id: &str, duplicate: Option<usize>) -> anyhow::Result<usize> {
        self.edit(id, |editor| {
            match duplicate {
                Some(n) => {
                    let index = slide_index(editor, n)?;
                    editor.duplicate_slide(index);
                }
                None => {
                    editor.add_slide();
                }
            }
            Ok(editor.slides().len())
        })
    }

    /// Remove slide `slide` (1-based). Returns the new slide count.
    pub fn remove_slide(&mut self, id: &str, slide: usize) -> anyhow::Result<usize> {
        self.edit(id, |editor| {
            let index = slide_index(editor, slide)?;
            if !editor.remove_slide(index) {
                bail!("A project keeps at least one slide");
            }
            Ok(editor.slides().len())
        })
    }

    /// Add a text layer to slide `slide` (1-based). Returns the layer id.
    pub fn add_text(&mut self, id: &str, slide: usize, role: &str, content: Option<&str>) -> anyhow::Result<String> {
        self.edit(id, |editor| {
            editor.select_slide(slide_index(editor, slide)?);
            let layer_id = editor.add_text_layer(LayerRole::from_name(role));
            if let Some(content) = content {
                editor.update_text_layer(&layer_id, LayerEdit::Content(content.to_string()));
            }
            Ok(layer_id)
        })
    }

    pub fn remove_text(&mut self, id: &str, slide: usize, layer: &str) -> anyhow::Result<()> {
        self.edit(id, |editor| {
            editor.select_slide(slide_index(editor, slide)?);
            if !editor.remove_text_layer(layer) {
                bail!("Slide {} has no text layer '{}'", slide, layer);
            }
            Ok(())
        })
    }

    pub fn apply_template(&mut self, id: &str, slide: usize, template: &str) -> anyhow::Result<()> {
        let template = Template::from_name(template).ok_or_else(|| {
            let names: Vec<&str> = Template::all().iter().map(Template::name).collect();
            anyhow!("Unknown template '{}' (expected one of {})", template, names.join(", "))
        })?;
        self.edit(id, |editor| {
            editor.select_slide(slide_index(editor, slide)?);
            editor.update_slide(SlideEdit::Template(template));
            Ok(())
        })
    }

    /// Embed the image at `path` on slide `slide`, or clear it when `path` is `None`.
    pub fn set_image(&mut self, id: &str, slide: usize, path: Option<&Path>) -> anyhow::Result<()> {
        let data = match path {
            Some(path) => Some(std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?),
            None => None,
        };
        self.edit(id, |editor| {
            editor.select_slide(slide_index(editor, slide)?);
            match &data {
                Some(bytes) if !editor.set_image(bytes) => bail!("Unsupported image format"),
                Some(_) => {}
                None => editor.clear_image(),
            }
            Ok(())
        })
    }

    /// Export every slide of a project into the configured export directory.
    pub fn export(&self, id: &str) -> anyhow::Result<ExportReport> {
        let project = self.project(id)?;
        let exporter = Exporter::new(
            SvgRasterizerLoader::new(self.config.font_dir().map(Path::to_path_buf)),
            DirectorySink::new(&self.config.export_dir),
        );
        match block_on(exporter.export(&project.name, &project.slides))? {
            ExportOutcome::Completed(report) => Ok(report),
            ExportOutcome::Busy => bail!("An export is already running"),
        }
    }

    /// Render slide `slide` (1-based) as the editor shows it and write it to the export
    /// directory. Returns the written path.
    pub fn preview(&self, id: &str, slide: usize, layer: Option<&str>, guides: bool) -> anyhow::Result<PathBuf> {
        let mut editor = Editor::open(self.project(id)?);
        editor.select_slide(slide_index(&editor, slide)?);
        if let Some(layer) = layer {
            if editor.active_slide().layer(layer).is_none() {
                bail!("Slide {} has no text layer '{}'", slide, layer);
            }
            editor.select_layer(Some(layer.to_string()));
        }
        editor.set_show_guides(guides);

        let composition = render(editor.active_slide(), &RenderOptions::for_editor(&editor));
        let rasterizer = SvgRasterizer::new(self.config.font_dir());
        let image = block_on(rasterizer.rasterize(&composition)).context("render preview")?;

        let sink = DirectorySink::new(&self.config.export_dir);
        let file_name = format!("{}-{}-preview.png", editor.name(), slide);
        block_on(sink.save(&file_name, &image))?;
        Ok(sink.path_for(&file_name))
    }

    fn project(&self, id: &str) -> anyhow::Result<&Project> {
        self.library
            .require(id)
            .with_context(|| format!("No project with id '{}'", id))
    }

    /// Open a project, apply `change`, and save it.
    fn edit<T>(&mut self, id: &str, change: impl FnOnce(&mut Editor) -> anyhow::Result<T>) -> anyhow::Result<T> {
        let mut editor = Editor::open(self.project(id)?);
        let result = change(&mut editor)?;
        self.save(&mut editor)?;
        Ok(result)
    }

    /// Save through the same deferred path the editor's save button uses.
    fn save(&mut self, editor: &mut Editor) -> anyhow::Result<()> {
        let mut saver = SaveController::new();
        if !saver.request(Instant::now(), self.session.is_signed_in()) {
            bail!("Sign in to save projects (carousel login)");
        }
        std::thread::sleep(SAVE_DELAY);
        let now = Instant::now();
        match block_on(saver.poll(now, editor, &mut self.library)) {
            Some(SaveStatus::Saved) => Ok(()),
            Some(status) => bail!(status.message()),
            None => bail!("Save did not run"),
        }
    }
}

/// Convert a 1-based slide number into an index.
fn slide_index(editor: &Editor, number: usize) -> anyhow::Result<usize> {
    let count = editor.slides().len();
    if number == 0 || number > count {
        bail!("Slide {} does not exist (project has {} slides)", number, count);
    }
    Ok(number - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    fn studio() -> (TempDir, Studio) {
        let dir = tempdir().unwrap();
        let config = StudioConfig::new(Some(dir.path().join("data")))
            .with_export_dir(Some(dir.path().join("exports")));
        let studio = Studio::open(config).unwrap();
        (dir, studio)
    }

    fn reopen(studio: &Studio) -> Studio {
        Studio::open(studio.config().clone()).unwrap()
    }

    #[test]
    fn test_login_survives_restart() {
        let (_dir, mut studio) = studio();
        assert_eq!(studio.whoami(), None);
        assert_eq!(studio.login("").unwrap(), "guest@demo.com");
        assert_eq!(reopen(&studio).whoami(), Some("guest@demo.com"));

        studio.logout().unwrap();
        assert_eq!(reopen(&studio).whoami(), None);
    }

    #[test]
    fn test_saving_requires_sign_in() {
        let (_dir, mut studio) = studio();
        assert!(studio.create_project(Some("Deck")).is_err());
        assert!(studio.projects().is_empty());
    }

    #[test]
    fn test_project_lifecycle() {
        let (_dir, mut studio) = studio();
        studio.login("ana@example.com").unwrap();

        let id = studio.create_project(Some("Launch")).unwrap();
        assert_eq!(studio.add_slide(&id, None).unwrap(), 2);
        assert_eq!(studio.add_slide(&id, Some(1)).unwrap(), 3);
        assert!(studio.add_slide(&id, Some(9)).is_err());

        studio.add_text(&id, 2, "subtitle", Some("Hello")).unwrap();
        studio.apply_template(&id, 3, "image-bottom").unwrap();
        assert!(studio.apply_template(&id, 1, "diagonal").is_err());

        let reopened = reopen(&studio);
        let project = &reopened.projects()[0];
        assert_eq!(project.name, "Launch");
        assert_eq!(project.slides.len(), 3);
        let layer = project.slides[1].text_layers.last().unwrap();
        assert_eq!((layer.content.as_str(), layer.font_size), ("Hello", 20.0));
        assert_eq!(project.slides[2].img_box_y, 50.0);

        studio.delete_project(&id).unwrap();
        assert!(studio.delete_project(&id).is_err());
        assert!(reopen(&studio).projects().is_empty());
    }

    #[test]
    fn test_rename_and_remove() {
        let (_dir, mut studio) = studio();
        studio.login("a@b.c").unwrap();
        let id = studio.create_project(Some("Draft")).unwrap();

        studio.rename_project(&id, "  Final ").unwrap();
        assert!(studio.rename_project(&id, " ").is_err());
        assert!(studio.rename_project("missing", "X").is_err());

        assert!(studio.remove_slide(&id, 1).is_err());
        studio.add_slide(&id, None).unwrap();
        assert_eq!(studio.remove_slide(&id, 1).unwrap(), 1);

        let layer = studio.add_text(&id, 1, "caption", None).unwrap();
        studio.remove_text(&id, 1, &layer).unwrap();
        assert!(studio.remove_text(&id, 1, &layer).is_err());

        let reopened = reopen(&studio);
        let project = &reopened.projects()[0];
        assert_eq!(project.name, "Final");
        assert_eq!(project.slides.len(), 1);
        assert_eq!(project.slides[0].text_layers.len(), 2);
    }

    #[test]
    fn test_preview_writes_editor_view() {
        let (dir, mut studio) = studio();
        studio.login("a@b.c").unwrap();
        let id = studio.create_project(Some("Deck")).unwrap();
        let layer = studio.add_text(&id, 1, "title", None).unwrap();

        let path = studio.preview(&id, 1, Some(&layer), true).unwrap();
        assert_eq!(path, dir.path().join("exports").join("Deck-1-preview.png"));
        assert!(path.is_file());
        assert!(studio.preview(&id, 1, Some("nope"), true).is_err());
        assert!(studio.preview(&id, 2, None, false).is_err());
    }

    #[test]
    fn test_set_image_rejects_unknown_format() {
        let (dir, mut studio) = studio();
        studio.login("a@b.c").unwrap();
        let id = studio.create_project(None).unwrap();

        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        assert!(studio.set_image(&id, 1, Some(&path)).is_err());
        assert!(studio.projects()[0].slides[0].image_url.is_empty());
    }

    #[test]
    fn test_export_writes_one_png_per_slide() {
        let (dir, mut studio) = studio();
        studio.login("a@b.c").unwrap();
        let id = studio.create_project(Some("Deck")).unwrap();
        studio.add_slide(&id, None).unwrap();

        let report = studio.export(&id).unwrap();
        assert_eq!(report.exported, vec!["Deck-1.png", "Deck-2.png"]);
        assert!(dir.path().join("exports").join("Deck-2.png").is_file());
    }
}
