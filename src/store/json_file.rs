//! JSON file state store.
//!
//! The file is read on every call so external edits are picked up without
//! a restart. Writes go to a sibling temp file and are renamed into place.
//! A missing file reads as an empty list.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use super::{apply_toggle, parse_states, ImageState, StateStore, Toggle};
use crate::error::{GalleryError, Result};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `seed` if the file does not exist yet. Existing files win.
    pub fn initialize(&self, seed: &[ImageState]) -> Result<()> {
        if seed.is_empty() || self.path.exists() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().map_err(|_| GalleryError::LockPoisoned)?;
        self.write(seed)
    }

    fn read(&self) -> Result<Vec<ImageState>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_states(&raw, &self.path.display().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(GalleryError::file(&self.path, e)),
        }
    }

    fn write(&self, states: &[ImageState]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| GalleryError::file(parent, e))?;
        }

        let json = serde_json::to_string_pretty(states).map_err(|source| GalleryError::StateParse {
            origin: self.path.display().to_string(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| GalleryError::file(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| GalleryError::file(&self.path, e))?;

        debug!(path = %self.path.display(), records = states.len(), "wrote image state");
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn snapshot(&self) -> Result<Vec<ImageState>> {
        self.read()
    }

    fn toggle(&self, id: &str, toggle: Toggle) -> Result<ImageState> {
        let _guard = self.write_lock.lock().map_err(|_| GalleryError::LockPoisoned)?;
        let mut states = self.read()?;
        let updated = apply_toggle(&mut states, id, toggle);
        self.write(&states)?;
        Ok(updated)
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}
