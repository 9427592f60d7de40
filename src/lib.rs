//! # Gallery
//!
//! A small GraphQL API over a directory of images.
//!
//! Every file in the images directory becomes an `Image` whose ID is its
//! 1-based position in the sorted listing. Clients can toggle a "liked"
//! and a "featured" flag per image; that state lives in memory or in a
//! flat JSON file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gallery::{build_schema, Gallery, MemoryStore};
//! use std::sync::Arc;
//!
//! let gallery = Gallery::new("public/images", "/images", Arc::new(MemoryStore::default()));
//! let images = gallery.images().unwrap();
//! let schema = build_schema(gallery);
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod gallery;
pub mod graphql;
pub mod server;
pub mod store;

// Re-exports for convenience
pub use error::{GalleryError, Result};

pub use catalog::{build_images, mirror_images, scan_images, Image, MirrorStats};
pub use config::GalleryConfig;
pub use gallery::Gallery;
pub use store::{ImageState, JsonFileStore, MemoryStore, StateStore, Toggle};

// GraphQL
pub use graphql::{build_schema, execute, schema_sdl, GallerySchema};
