//! Path resolution between asset references and the site's filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolves asset references against the site's public root.
pub trait ResolvePath {
    /// Site public root; targets are written beneath it.
    fn site_root(&self) -> &Path;

    /// Absolute location of an asset reference as registered by the host.
    fn resolve(&self, reference: &str) -> PathBuf;

    /// `path` relative to the site root, `/`-separated. Paths outside the
    /// root are returned as given.
    fn site_relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.site_root()).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Create `dir` (relative to the site root) unless it already exists.
    fn ensure_dir(&self, dir: &str) -> io::Result<PathBuf> {
        let path = self.site_root().join(dir);
        if !path.is_dir() {
            fs::create_dir_all(&path)?;
        }
        Ok(path)
    }
}

/// Resolver for a site served from a single public directory.
///
/// # Examples
/// ```text
/// root = /srv/site/public
///
/// css/main.css                   → /srv/site/public/css/main.css
/// /css/main.css                  → /srv/site/public/css/main.css
/// /srv/site/public/css/main.css  → /srv/site/public/css/main.css
/// ```
#[derive(Debug, Clone)]
pub struct SiteResolver {
    root: PathBuf,
}

impl SiteResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResolvePath for SiteResolver {
    fn site_root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() && path.starts_with(&self.root) {
            return path.to_path_buf();
        }
        self.root.join(reference.trim_start_matches('/'))
    }
}

// ============================================================================
// Tests
// ============================================================================
