//! Gallery operations — the logic behind every GraphQL resolver.
//!
//! All methods are blocking (directory walk, state file I/O). Async callers
//! should run them on a blocking thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::catalog::{build_images, scan_images, Image};
use crate::config::GalleryConfig;
use crate::error::Result;
use crate::store::{open_store, seed_from_env, StateStore, Toggle};

/// Image directory plus state store. Cheap to clone.
#[derive(Clone)]
pub struct Gallery {
    images_dir: PathBuf,
    url_prefix: String,
    store: Arc<dyn StateStore>,
}

impl Gallery {
    pub fn new(
        images_dir: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            images_dir: images_dir.into(),
            url_prefix: url_prefix.into(),
            store,
        }
    }

    /// Open the configured store, seeded from `IMAGE_DATA`.
    pub fn from_config(config: &GalleryConfig) -> Result<Self> {
        let seed = seed_from_env()?;
        let store = open_store(&config.store, seed)?;
        Ok(Self::new(
            config.images.dir.clone(),
            config.images.url_prefix.clone(),
            store,
        ))
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    /// Every image in the directory, with its current state.
    pub fn images(&self) -> Result<Vec<Image>> {
        let files = scan_images(&self.images_dir)?;
        let states = self.store.snapshot()?;
        Ok(build_images(&files, &states, &self.url_prefix))
    }

    /// A single image by ID, if a file exists at that position.
    pub fn image(&self, id: &str) -> Result<Option<Image>> {
        Ok(self.images()?.into_iter().find(|img| img.id == id))
    }

    /// Toggle the like flag and return the recomputed image.
    pub fn like_image(&self, id: &str) -> Result<Option<Image>> {
        self.toggle(id, Toggle::Like)
    }

    /// Toggle the featured flag and return the recomputed image.
    pub fn mark_featured(&self, id: &str) -> Result<Option<Image>> {
        self.toggle(id, Toggle::Feature)
    }

    /// The state change is recorded even when no file has this ID; the
    /// result is then `None`.
    fn toggle(&self, id: &str, toggle: Toggle) -> Result<Option<Image>> {
        let state = self.store.toggle(id, toggle)?;
        info!(
            id,
            ?toggle,
            likes = state.likes,
            featured = state.is_featured,
            "image state toggled"
        );
        self.image(id)
    }
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("images_dir", &self.images_dir)
            .field("url_prefix", &self.url_prefix)
            .field("store", &self.store.backend_name())
            .finish()
    }
}
