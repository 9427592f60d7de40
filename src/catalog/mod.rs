//! Image catalog: directory listing, positional IDs and the startup mirror.
//!
//! The catalog has no state of its own. Every listing is recomputed from
//! the directory contents, so IDs shift if files are added or removed
//! ahead of existing ones in sort order.

pub mod mirror;
pub mod scanner;
pub mod types;

pub use mirror::{mirror_images, MirrorStats};
pub use scanner::scan_images;
pub use types::{build_images, Image, DEFAULT_URL_PREFIX};
