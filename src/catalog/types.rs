//! Core catalog types.

use serde::{Deserialize, Serialize};

use crate::store::ImageState;

/// URL path under which image files are published.
pub const DEFAULT_URL_PREFIX: &str = "/images";

/// One image as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// 1-based position in the sorted directory listing, as a string.
    pub id: String,
    /// Public URL path of the file (e.g. "/images/cat.jpg").
    pub src: String,
    /// Alternate text; the file name.
    pub alt: String,
    pub likes: i32,
    pub is_featured: bool,
}

impl Image {
    fn new(position: usize, file_name: &str, url_prefix: &str, state: Option<&ImageState>) -> Self {
        let (likes, is_featured) = state.map_or((0, false), |s| (s.likes, s.is_featured));
        Self {
            id: position_id(position),
            src: format!("{}/{}", url_prefix.trim_end_matches('/'), file_name),
            alt: file_name.to_string(),
            likes,
            is_featured,
        }
    }
}

/// ID for the file at zero-based `index` in the listing.
pub fn position_id(index: usize) -> String {
    (index + 1).to_string()
}

/// Merge a sorted file listing with recorded state.
///
/// Files without a state record get `likes = 0` and `is_featured = false`.
/// State records whose ID matches no file are ignored.
pub fn build_images(files: &[String], states: &[ImageState], url_prefix: &str) -> Vec<Image> {
    files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let id = position_id(index);
            let state = states.iter().find(|s| s.id == id);
            Image::new(index, file, url_prefix, state)
        })
        .collect()
}
