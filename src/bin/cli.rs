//! Gallery CLI - GraphQL API for liking and featuring images.
//!
//! Usage:
//!   gallery                      # Start the server (same as `serve`)
//!   gallery serve --port 4000    # Start the server on a given port
//!   gallery list                 # Print all images as JSON
//!   gallery like <id>            # Toggle like
//!   gallery feature <id>         # Toggle featured
//!   gallery mirror               # Copy source images into the public dir
//!   gallery schema               # Print GraphQL SDL

use anyhow::{bail, Result};
use clap::Parser;
use gallery::cli::{Cli, Commands};
use gallery::config::StoreBackend;
use gallery::{mirror_images, schema_sdl, server, Gallery};
use tracing::warn;

#[tokio::main]
async fn main() {
    // Logs go to stderr so `list`/`schema` output stays clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    match cli.command {
        None | Some(Commands::Serve { .. }) => {
            server::serve(config).await?;
        }

        Some(Commands::List) => {
            let gallery = Gallery::from_config(&config)?;
            let images = tokio::task::spawn_blocking(move || gallery.images()).await??;
            println!("{}", serde_json::to_string_pretty(&images)?);
        }

        Some(Commands::Like { id }) => {
            warn_if_transient(config.store.backend);
            let gallery = Gallery::from_config(&config)?;
            let image = tokio::task::spawn_blocking(move || gallery.like_image(&id)).await??;
            print_toggled(image)?;
        }

        Some(Commands::Feature { id }) => {
            warn_if_transient(config.store.backend);
            let gallery = Gallery::from_config(&config)?;
            let image = tokio::task::spawn_blocking(move || gallery.mark_featured(&id)).await??;
            print_toggled(image)?;
        }

        Some(Commands::Mirror) => {
            let Some(source) = config.images.mirror_from.clone() else {
                bail!("images.mirror_from is not set in the config");
            };
            let target = config.images.dir.clone();
            let stats = tokio::task::spawn_blocking(move || mirror_images(&source, &target)).await??;
            println!("✓ {}", stats);
        }

        Some(Commands::Schema) => {
            println!("{}", schema_sdl());
        }
    }

    Ok(())
}

fn warn_if_transient(backend: StoreBackend) {
    if backend == StoreBackend::Memory {
        warn!("memory store selected; this change is lost when the command exits");
    }
}

fn print_toggled(image: Option<gallery::Image>) -> Result<()> {
    match image {
        Some(image) => println!("{}", serde_json::to_string_pretty(&image)?),
        None => println!("null"),
    }
    Ok(())
}
