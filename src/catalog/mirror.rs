//! Startup mirror — copies a source image directory into the public one.

use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::scanner::top_level_files;
use crate::error::{GalleryError, Result};

/// Summary of a mirror run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub files_copied: usize,
    pub bytes_copied: u64,
}

impl std::fmt::Display for MirrorStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Copied {} files ({} bytes)", self.files_copied, self.bytes_copied)
    }
}

/// Copy every top-level file from `source` into `target`.
///
/// `target` is created if it does not exist. Same-named files are
/// overwritten; files present only in `target` are left in place.
/// Subdirectories and dangling symlinks are not copied. Mirroring a
/// directory onto itself is a no-op.
pub fn mirror_images(source: &Path, target: &Path) -> Result<MirrorStats> {
    let files = top_level_files(source)?;
    fs::create_dir_all(target).map_err(|e| GalleryError::file(target, e))?;

    if same_directory(source, target)? {
        warn!(
            dir = %source.display(),
            "mirror source and target are the same directory, skipping copy"
        );
        return Ok(MirrorStats::default());
    }

    let sizes: Vec<u64> = files
        .par_iter()
        .filter_map(|path| path.file_name().map(|name| (path, target.join(name))))
        .map(|(from, to)| {
            debug!(from = %from.display(), to = %to.display(), "copying image");
            fs::copy(from, &to).map_err(|e| GalleryError::file(from.as_path(), e))
        })
        .collect::<Result<_>>()?;

    let stats = MirrorStats {
        files_copied: sizes.len(),
        bytes_copied: sizes.iter().sum(),
    };
    info!(
        source = %source.display(),
        target = %target.display(),
        files = stats.files_copied,
        bytes = stats.bytes_copied,
        "mirrored images"
    );
    Ok(stats)
}

/// Compares canonical forms; both paths must exist.
fn same_directory(source: &Path, target: &Path) -> Result<bool> {
    let source = source
        .canonicalize()
        .map_err(|e| GalleryError::file(source, e))?;
    let target = target
        .canonicalize()
        .map_err(|e| GalleryError::file(target, e))?;
    Ok(source == target)
}
