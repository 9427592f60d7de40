//! In-memory state store. Contents are lost on restart.

use std::sync::RwLock;

use super::{apply_toggle, ImageState, StateStore, Toggle};
use crate::error::{GalleryError, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    states: RwLock<Vec<ImageState>>,
}

impl MemoryStore {
    pub fn new(seed: Vec<ImageState>) -> Self {
        Self {
            states: RwLock::new(seed),
        }
    }
}

impl StateStore for MemoryStore {
    fn snapshot(&self) -> Result<Vec<ImageState>> {
        let states = self.states.read().map_err(|_| GalleryError::LockPoisoned)?;
        Ok(states.clone())
    }

    fn toggle(&self, id: &str, toggle: Toggle) -> Result<ImageState> {
        let mut states = self.states.write().map_err(|_| GalleryError::LockPoisoned)?;
        Ok(apply_toggle(&mut states, id, toggle))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
