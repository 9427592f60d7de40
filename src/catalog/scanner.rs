//! Directory scanner — lists the entries that make up the catalog.
//!
//! Only the top level of the directory is considered. Every entry counts
//! toward positional IDs, dotfiles and subdirectories included. Symlinks
//! are listed as-is and never resolved, so a dangling link still takes
//! its place in the listing.

use ignore::{Walk, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{GalleryError, Result};

/// Walker over the direct children of `dir`, sorted by file name.
pub(crate) fn walk_top_level(dir: &Path) -> Walk {
    WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
}

/// Paths of every entry directly inside `dir`, in listing order.
pub(crate) fn top_level_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(GalleryError::ImagesDirMissing(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in walk_top_level(dir) {
        let entry = entry?;
        if entry.depth() == 0 {
            continue;
        }
        entries.push(entry.into_path());
    }
    Ok(entries)
}

/// Entries of `dir` that resolve to regular files, following symlinks.
/// Dangling links and subdirectories are left out.
pub(crate) fn top_level_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(top_level_entries(dir)?
        .into_iter()
        .filter(|path| {
            let is_file = path.is_file();
            if !is_file {
                debug!(path = %path.display(), "skipping non-file entry");
            }
            is_file
        })
        .collect())
}

/// Names of every entry in `dir`, sorted by name in byte order.
///
/// The position of a name in the returned list determines its image ID.
pub fn scan_images(dir: &Path) -> Result<Vec<String>> {
    let names: Vec<String> = top_level_entries(dir)?
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    debug!(dir = %dir.display(), count = names.len(), "scanned images directory");
    Ok(names)
}
