//! Like/feature state persistence.
//!
//! State is a flat list of [`ImageState`] records keyed by image ID. Two
//! backends exist: an in-memory list and a JSON file re-read on every call.

pub mod json_file;
pub mod memory;

use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::sync::Arc;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::{GalleryError, Result};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Environment variable holding the initial state as a JSON array.
pub const IMAGE_DATA_ENV: &str = "IMAGE_DATA";

/// Recorded state for one image ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageState {
    pub id: String,
    #[serde(default)]
    pub likes: i32,
    #[serde(default)]
    pub is_featured: bool,
}

/// Which flag a mutation flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Like,
    Feature,
}

/// Storage for image state.
pub trait StateStore: Send + Sync {
    /// All recorded state, in insertion order.
    fn snapshot(&self) -> Result<Vec<ImageState>>;

    /// Flip one flag for `id`, creating the record if needed.
    /// Returns the record after the change.
    fn toggle(&self, id: &str, toggle: Toggle) -> Result<ImageState>;

    /// Short name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Apply a toggle to a state list in place.
///
/// Liking flips `likes` between 0 and 1 (any non-zero count goes to 0).
/// Featuring negates `is_featured`. Unknown IDs get a fresh record with
/// only the toggled flag set.
pub fn apply_toggle(states: &mut Vec<ImageState>, id: &str, toggle: Toggle) -> ImageState {
    if let Some(state) = states.iter_mut().find(|s| s.id == id) {
        match toggle {
            Toggle::Like => state.likes = if state.likes == 0 { 1 } else { 0 },
            Toggle::Feature => state.is_featured = !state.is_featured,
        }
        return state.clone();
    }

    let state = ImageState {
        id: id.to_string(),
        likes: if toggle == Toggle::Like { 1 } else { 0 },
        is_featured: toggle == Toggle::Feature,
    };
    states.push(state.clone());
    state
}

/// Parse a JSON array of state records. Blank input is an empty list.
pub fn parse_states(raw: &str, origin: &str) -> Result<Vec<ImageState>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|source| GalleryError::StateParse {
        origin: origin.to_string(),
        source,
    })
}

/// Initial state from the `IMAGE_DATA` environment variable.
pub fn seed_from_env() -> Result<Vec<ImageState>> {
    seed_from_var(std::env::var(IMAGE_DATA_ENV))
}

/// Unset means no seed. A value that is not valid UTF-8 is rejected.
fn seed_from_var(value: std::result::Result<String, VarError>) -> Result<Vec<ImageState>> {
    match value {
        Ok(raw) => parse_states(&raw, IMAGE_DATA_ENV),
        Err(VarError::NotPresent) => Ok(Vec::new()),
        Err(VarError::NotUnicode(_)) => Err(GalleryError::Config(format!(
            "{} is not valid UTF-8",
            IMAGE_DATA_ENV
        ))),
    }
}

/// Build the configured store, applying `seed` as its initial contents.
pub fn open_store(config: &StoreConfig, seed: Vec<ImageState>) -> Result<Arc<dyn StateStore>> {
    let store: Arc<dyn StateStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(seed)),
        StoreBackend::Json => {
            let store = JsonFileStore::new(&config.path);
            store.initialize(&seed)?;
            Arc::new(store)
        }
    };
    info!(backend = store.backend_name(), "image state store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str, likes: i32, is_featured: bool) -> ImageState {
        ImageState {
            id: id.to_string(),
            likes,
            is_featured,
        }
    }

    #[test]
    fn test_like_unknown_id_appends() {
        let mut states = Vec::new();
        let result = apply_toggle(&mut states, "3", Toggle::Like);
        assert_eq!(result, state("3", 1, false));
        assert_eq!(states, vec![state("3", 1, false)]);
    }

    #[test]
    fn test_feature_unknown_id_appends() {
        let mut states = Vec::new();
        let result = apply_toggle(&mut states, "1", Toggle::Feature);
        assert_eq!(result, state("1", 0, true));
    }

    #[test]
    fn test_like_toggles_between_zero_and_one() {
        let mut states = vec![state("1", 0, true)];
        assert_eq!(apply_toggle(&mut states, "1", Toggle::Like).likes, 1);
        assert_eq!(apply_toggle(&mut states, "1", Toggle::Like).likes, 0);
        assert!(states[0].is_featured);
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn test_like_resets_larger_counts() {
        let mut states = vec![state("1", 7, false)];
        assert_eq!(apply_toggle(&mut states, "1", Toggle::Like).likes, 0);
    }

    #[test]
    fn test_feature_negates() {
        let mut states = vec![state("2", 1, false)];
        assert!(apply_toggle(&mut states, "2", Toggle::Feature).is_featured);
        assert!(!apply_toggle(&mut states, "2", Toggle::Feature).is_featured);
        assert_eq!(states[0].likes, 1);
    }

    #[test]
    fn test_parse_states_defaults_missing_fields() {
        let states = parse_states(r#"[{"id":"1"},{"id":"2","likes":1,"isFeatured":true}]"#, "test")
            .unwrap();
        assert_eq!(states, vec![state("1", 0, false), state("2", 1, true)]);
    }

    #[test]
    fn test_parse_states_blank_is_empty() {
        assert!(parse_states("  \n", "test").unwrap().is_empty());
    }

    #[test]
    fn test_seed_unset_is_empty() {
        assert!(seed_from_var(Err(VarError::NotPresent)).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_seed_not_unicode_is_rejected() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'[', 0xff, b']']);
        let err = seed_from_var(Err(VarError::NotUnicode(raw))).unwrap_err();
        assert!(matches!(err, GalleryError::Config(ref msg) if msg.contains(IMAGE_DATA_ENV)));
    }

    #[test]
    fn test_seed_flows_into_memory_store() {
        let seed = seed_from_var(Ok(r#"[{"id":"2","likes":1,"isFeatured":true}]"#.to_string()))
            .unwrap();
        let store = open_store(&StoreConfig::default(), seed).unwrap();

        assert_eq!(store.backend_name(), "memory");
        assert_eq!(store.snapshot().unwrap(), vec![state("2", 1, true)]);
    }

    #[test]
    fn test_seed_flows_into_new_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Json,
            path: dir.path().join("state.json"),
        };
        let seed = seed_from_var(Ok(r#"[{"id":"1","likes":1}]"#.to_string())).unwrap();
        let store = open_store(&config, seed).unwrap();

        assert_eq!(store.backend_name(), "json");
        assert_eq!(store.snapshot().unwrap(), vec![state("1", 1, false)]);
        assert!(config.path.exists());
    }

    #[test]
    fn test_invalid_seed_json_is_rejected() {
        let err = seed_from_var(Ok("[{".to_string())).unwrap_err();
        assert!(matches!(err, GalleryError::StateParse { .. }));
    }

    #[test]
    fn test_parse_states_invalid_json() {
        let err = parse_states("{not json", "IMAGE_DATA").unwrap_err();
        assert!(matches!(err, GalleryError::StateParse { ref origin, .. } if origin == "IMAGE_DATA"));
    }
}
