//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carousel", version, about = "Build and export carousel slide decks")]
pub struct Cli {
    /// Directory holding saved projects and the signed-in user.
    #[arg(long, global = true, env = "CAROUSEL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in. A blank email signs in as the guest user.
    Login {
        #[arg(default_value = "")]
        email: String,
    },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Create and save a new project.
    New(NewArgs),
    /// List saved projects.
    List,
    /// Delete a saved project.
    Delete { id: String },
    /// Rename a saved project.
    Rename { id: String, name: String },
    /// Append a slide, or duplicate an existing one.
    AddSlide(AddSlideArgs),
    /// Remove a slide. The last remaining slide is kept.
    RemoveSlide(SlideArgs),
    /// Add a text layer to a slide.
    AddText(AddTextArgs),
    /// Remove a text layer from a slide.
    RemoveText(RemoveTextArgs),
    /// Apply a layout template to a slide.
    Template(TemplateArgs),
    /// Set or clear a slide's image.
    Image(ImageArgs),
    /// Export every slide as a 1080x1350 PNG.
    Export(ExportArgs),
    /// Render one slide as the editor shows it, guides and selection included.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Project name.
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AddSlideArgs {
    pub id: String,

    /// Duplicate this slide (1-based) instead of appending a blank one.
    #[arg(long)]
    pub duplicate: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct SlideArgs {
    pub id: String,

    /// Slide number (1-based).
    #[arg(long, default_value_t = 1)]
    pub slide: usize,
}

#[derive(Parser, Debug)]
pub struct RemoveTextArgs {
    pub id: String,

    /// Layer id, as printed by add-text.
    pub layer: String,

    /// Slide number (1-based).
    #[arg(long, default_value_t = 1)]
    pub slide: usize,
}

#[derive(Parser, Debug)]
pub struct AddTextArgs {
    pub id: String,

    /// Slide number (1-based).
    #[arg(long, default_value_t = 1)]
    pub slide: usize,

    /// Layer role: title, subtitle, body, caption or anything else for a plain layer.
    #[arg(long, default_value = "default")]
    pub role: String,

    /// Replace the role's default text.
    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TemplateArgs {
    pub id: String,

    /// text-only, image-top, image-bottom or split.
    pub template: String,

    /// Slide number (1-based).
    #[arg(long, default_value_t = 1)]
    pub slide: usize,
}

#[derive(Parser, Debug)]
pub struct ImageArgs {
    pub id: String,

    /// PNG, JPEG, WebP or GIF file. Omit to clear the image.
    pub path: Option<PathBuf>,

    /// Slide number (1-based).
    #[arg(long, default_value_t = 1)]
    pub slide: usize,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    pub id: String,

    /// Output directory. Defaults to the downloads folder.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Extra directory of .ttf/.otf/.ttc fonts.
    #[arg(long)]
    pub font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    pub id: String,

    /// Slide number (1-based).
    #[arg(long, default_value_t = 1)]
    pub slide: usize,

    /// Select this layer so its outline and width handle are drawn.
    #[arg(long)]
    pub layer: Option<String>,

    /// Hide the safe-zone guide.
    #[arg(long)]
    pub no_guides: bool,

    /// Output directory. Defaults to the downloads folder.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Extra directory of .ttf/.otf/.ttc fonts.
    #[arg(long)]
    pub font_dir: Option<PathBuf>,
}
