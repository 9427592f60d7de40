//! CLI module for the gallery.
//!
//! Commands:
//! - Server: serve (default)
//! - Catalog: list, like, feature
//! - Maintenance: mirror, schema

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{GalleryConfig, CONFIG_FILE};
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "gallery")]
#[command(about = "Gallery - GraphQL API for liking and featuring images", long_about = None)]
pub struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/gallery.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    // ─── Server ──────────────────────────────────────────────────
    /// Start the GraphQL server
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    // ─── Catalog ─────────────────────────────────────────────────
    /// Print all images as JSON
    List,

    /// Toggle the like flag of an image
    Like {
        /// Image ID (1-based position in the directory listing)
        id: String,
    },

    /// Toggle the featured flag of an image
    Feature {
        /// Image ID (1-based position in the directory listing)
        id: String,
    },

    // ─── Maintenance ─────────────────────────────────────────────
    /// Copy images from `images.mirror_from` into `images.dir`
    Mirror,

    /// Print the GraphQL schema (SDL)
    Schema,
}

impl Cli {
    /// Config file location for this invocation.
    pub fn config_path(&self, root: &Path) -> PathBuf {
        match &self.config {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.join(CONFIG_FILE),
        }
    }

    /// Load config, apply environment overrides and resolve paths.
    pub fn load_config(&self) -> Result<GalleryConfig> {
        let root = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        let mut config = GalleryConfig::load(&self.config_path(&root));
        config.apply_env()?;
        config.resolve_paths(&root);

        if let Some(Commands::Serve { port: Some(port) }) = &self.command {
            config.server.port = *port;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["gallery"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["gallery", "-r", "/srv", "like", "3"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv"));
        assert!(matches!(cli.command, Some(Commands::Like { ref id }) if id == "3"));

        let cli = Cli::try_parse_from(["gallery", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9000) })));
    }

    #[test]
    fn test_config_path() {
        let root = Path::new("/srv/app");
        let cli = Cli::try_parse_from(["gallery"]).unwrap();
        assert_eq!(cli.config_path(root), PathBuf::from("/srv/app/gallery.toml"));

        let cli = Cli::try_parse_from(["gallery", "-c", "conf/prod.toml"]).unwrap();
        assert_eq!(cli.config_path(root), PathBuf::from("/srv/app/conf/prod.toml"));
    }

    #[test]
    fn test_load_config_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[images]\ndir = \"pics\"\n",
        )
        .unwrap();

        let root = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["gallery", "--root", root.as_str(), "serve", "-p", "4100"])
            .unwrap();
        let config = cli.load_config().unwrap();

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.images.dir, root.join("pics"));
        assert_eq!(config.server.port, 4100);
    }
}
