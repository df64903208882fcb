use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::{error, info};

use quillpress::build;
use quillpress::config::Config;
use quillpress::post;

/// Generates blog posts from Markdown sources and keeps the paginated
/// listing pages consistent.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the Markdown source file
    source: Option<PathBuf>,

    /// URL path for the post (lowercase letters, numbers, and hyphens)
    slug: Option<String>,

    /// Rescan the sources and regenerate every listing page
    #[arg(long, conflicts_with_all = ["source", "slug"])]
    regenerate_pagination: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_directory(Path::new("."))?;

    if args.regenerate_pagination {
        info!("Regenerating pagination for all blog posts...");
        build::rebuild_listing(&config)?;
        return Ok(());
    }

    match (args.source, args.slug) {
        (Some(source), Some(slug)) => {
            build::generate_post(&config, &source, &slug)?;
            Ok(())
        }
        (Some(_), None) => Err(anyhow!(
            "provide both the source file and the URL path; see --help"
        )),
        _ => {
            list_available_posts(&config);
            Err(anyhow!(
                "provide a source file and URL path, or --regenerate-pagination; see --help"
            ))
        }
    }
}

/// Bare invocation: show the operator what could be generated before
/// failing, so scripts still notice that nothing was done.
fn list_available_posts(config: &Config) {
    match post::list_sources(&config.source_dir) {
        Ok(names) if names.is_empty() => {
            println!("No markdown files found in `{}`", config.source_dir.display());
        }
        Ok(names) => {
            println!("Available blog posts:");
            for name in names {
                println!("  - {}", name);
            }
        }
        Err(_) => {
            println!("`{}` directory not found", config.source_dir.display());
        }
    }
}
