//! Carousel Studio command-line entry point.

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::{Cli, Command};
use commands::Studio;
use config::StudioConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = StudioConfig::new(cli.data_dir);
    match &cli.cmd {
        Command::Export(args) => {
            config = config
                .with_export_dir(args.out.clone())
                .with_font_dir(args.font_dir.clone());
        }
        Command::Preview(args) => {
            config = config
                .with_export_dir(args.out.clone())
                .with_font_dir(args.font_dir.clone());
        }
        _ => {}
    }
    log::info!("Using data directory {}", config.data_dir.display());
    let mut studio = Studio::open(config)?;

    match cli.cmd {
        Command::Login { email } => {
            let email = studio.login(&email)?;
            println!("Signed in as {}", email);
        }
        Command::Logout => {
            studio.logout()?;
            println!("Signed out");
        }
        Command::Whoami => match studio.whoami() {
            Some(email) => println!("{}", email),
            None => println!("Not signed in"),
        },
        Command::New(args) => {
            let id = studio.create_project(args.name.as_deref())?;
            println!("{}", id);
        }
        Command::List => {
            for project in studio.projects() {
                println!(
                    "{}\t{}\t{} slides\tmodified {}",
                    project.id,
                    project.name,
                    project.slides.len(),
                    project.last_modified
                );
            }
        }
        Command::Delete { id } => {
            studio.delete_project(&id)?;
            println!("Deleted {}", id);
        }
        Command::Rename { id, name } => {
            studio.rename_project(&id, &name)?;
            println!("Renamed {} to {}", id, name.trim());
        }
        Command::AddSlide(args) => {
            let count = studio.add_slide(&args.id, args.duplicate)?;
            println!("Project now has {} slides", count);
        }
        Command::RemoveSlide(args) => {
            let count = studio.remove_slide(&args.id, args.slide)?;
            println!("Project now has {} slides", count);
        }
        Command::AddText(args) => {
            let layer_id = studio.add_text(&args.id, args.slide, &args.role, args.content.as_deref())?;
            println!("{}", layer_id);
        }
        Command::RemoveText(args) => {
            studio.remove_text(&args.id, args.slide, &args.layer)?;
            println!("Removed layer {} from slide {}", args.layer, args.slide);
        }
        Command::Template(args) => {
            studio.apply_template(&args.id, args.slide, &args.template)?;
            println!("Applied {} to slide {}", args.template, args.slide);
        }
        Command::Image(args) => {
            studio.set_image(&args.id, args.slide, args.path.as_deref())?;
            println!("Updated image on slide {}", args.slide);
        }
        Command::Export(args) => {
            let report = studio.export(&args.id)?;
            let dir = &studio.config().export_dir;
            for name in &report.exported {
                println!("wrote {}", dir.join(name).display());
            }
            for failure in &report.failed {
                eprintln!("failed {}: {}", failure.file_name, failure.reason);
            }
            if !report.failed.is_empty() {
                let total = report.failed.len() + report.exported.len();
                anyhow::bail!("{} of {} slides failed to export", report.failed.len(), total);
            }
        }
        Command::Preview(args) => {
            let path = studio.preview(&args.id, args.slide, args.layer.as_deref(), !args.no_guides)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
