//! Service configuration, loaded from `gallery.toml` with environment overrides.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 4000
//!
//! [images]
//! dir = "public/images"
//! url_prefix = "/images"
//! mirror_from = "images"
//! serve = true
//!
//! [store]
//! backend = "json"
//! path = "data/image-data.json"
//!
//! [cors]
//! allowed_origins = ["https://esaote.netlify.app"]
//! allow_credentials = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::catalog::DEFAULT_URL_PREFIX;
use crate::error::{GalleryError, Result};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "gallery.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub server: ServerConfig,
    pub images: ImagesConfig,
    pub store: StoreConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Directory whose files make up the catalog.
    pub dir: PathBuf,
    /// URL path prefix for `src` and for static serving.
    pub url_prefix: String,
    /// Copied into `dir` at startup when set.
    pub mirror_from: Option<PathBuf>,
    /// Serve `dir` under `url_prefix`.
    pub serve: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public").join("images"),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            mirror_from: None,
            serve: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Json,
}

impl std::str::FromStr for StoreBackend {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "json" => Ok(StoreBackend::Json),
            other => Err(GalleryError::Config(format!(
                "unknown store backend '{}' (expected 'memory' or 'json')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// State file for the `json` backend.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: PathBuf::from("data").join("image-data.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["https://esaote.netlify.app".to_string()],
            allow_credentials: true,
        }
    }
}

impl GalleryConfig {
    /// Load config from a TOML file.
    ///
    /// A missing file yields defaults. An unreadable or invalid file is
    /// logged and also yields defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| GalleryError::Config(e.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    ///
    /// Recognized keys: `PORT`, `GALLERY_HOST`, `GALLERY_STORE`,
    /// `GALLERY_STATE_FILE`, `CORS_ALLOW_ORIGIN` (comma-separated).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| GalleryError::Config(format!("invalid PORT '{}'", port)))?;
        }
        if let Some(host) = lookup("GALLERY_HOST") {
            self.server.host = host;
        }
        if let Some(backend) = lookup("GALLERY_STORE") {
            self.store.backend = backend.parse()?;
        }
        if let Some(path) = lookup("GALLERY_STATE_FILE") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(origins) = lookup("CORS_ALLOW_ORIGIN") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(())
    }

    /// Make relative paths absolute against `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        self.images.dir = resolve(root, &self.images.dir);
        self.store.path = resolve(root, &self.store.path);
        if let Some(from) = &self.images.mirror_from {
            self.images.mirror_from = Some(resolve(root, from));
        }
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = GalleryConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:4000");
        assert_eq!(config.images.url_prefix, "/images");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.cors.allowed_origins, vec!["https://esaote.netlify.app"]);
        assert!(config.cors.allow_credentials);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = GalleryConfig::parse(
            r#"
[server]
port = 8080

[store]
backend = "json"
path = "state.json"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Json);
        assert_eq!(config.store.path, PathBuf::from("state.json"));
        assert!(config.images.serve);
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(matches!(
            GalleryConfig::parse("[server\nport = "),
            Err(GalleryError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(GalleryConfig::load(&path), GalleryConfig::default());

        std::fs::write(&path, "server = 12").unwrap();
        assert_eq!(GalleryConfig::load(&path), GalleryConfig::default());

        std::fs::write(&path, "[images]\nserve = false\n").unwrap();
        assert!(!GalleryConfig::load(&path).images.serve);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "5000"),
            ("GALLERY_STORE", "JSON"),
            ("CORS_ALLOW_ORIGIN", "http://a.test, http://b.test,"),
        ]
        .into_iter()
        .collect();

        let mut config = GalleryConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.store.backend, StoreBackend::Json);
        assert_eq!(config.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = GalleryConfig::default();
        assert!(config
            .apply_overrides(|k| (k == "PORT").then(|| "http".to_string()))
            .is_err());
        assert!(config
            .apply_overrides(|k| (k == "GALLERY_STORE").then(|| "redis".to_string()))
            .is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = GalleryConfig::default();
        config.images.mirror_from = Some(PathBuf::from("images"));
        config.store.path = PathBuf::from("/var/lib/gallery/state.json");
        config.resolve_paths(Path::new("/srv/app"));

        assert_eq!(config.images.dir, PathBuf::from("/srv/app/public/images"));
        assert_eq!(config.images.mirror_from, Some(PathBuf::from("/srv/app/images")));
        assert_eq!(config.store.path, PathBuf::from("/var/lib/gallery/state.json"));
    }
}
