//! Configuration sections of `min.toml`.
//!
//! ```toml
//! [site]
//! root = "public"
//!
//! [compressor]
//! dir = "assets/compressed"
//! compression_level = 6
//!
//! [stylesheet]
//! post_process = true
//! rewrite_urls = true
//!
//! [script]
//! mangle = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use super::{ConfigDiagnostics, FieldPath};

/// Highest gzip compression level.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

// ============================================================================
// [site]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Public root of the site, relative to the config file.
    pub root: PathBuf,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl SiteSection {
    pub const ROOT: FieldPath = FieldPath::new("site.root");

    /// Check that the resolved site root exists.
    pub fn validate(&self, resolved: &Path, diag: &mut ConfigDiagnostics) {
        if !resolved.is_dir() {
            diag.error_with_hint(
                Self::ROOT,
                format!("directory `{}` does not exist", resolved.display()),
                "point site.root at the directory served as the web root",
            );
        }
    }
}

// ============================================================================
// [compressor]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Output directory for minified files, relative to the site root.
    pub dir: String,
    /// Gzip level (0-9); unset or 0 writes plain files.
    pub compression_level: Option<u32>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            dir: "assets/compressed".into(),
            compression_level: None,
        }
    }
}

impl CompressorConfig {
    pub const DIR: FieldPath = FieldPath::new("compressor.dir");
    pub const COMPRESSION_LEVEL: FieldPath = FieldPath::new("compressor.compression_level");

    /// # Checks
    /// - `dir` must be relative and stay beneath the site root
    /// - `compression_level` must be at most 9
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let dir = Path::new(&self.dir);
        if dir.is_absolute() {
            diag.error_with_hint(
                Self::DIR,
                format!("`{}` must be relative to the site root", self.dir),
                "e.g. dir = \"assets/compressed\"",
            );
        } else if dir.components().any(|c| c == Component::ParentDir) {
            diag.error(
                Self::DIR,
                format!("`{}` escapes the site root", self.dir),
            );
        }

        if let Some(level) = self.compression_level
            && level > MAX_COMPRESSION_LEVEL
        {
            diag.error_with_hint(
                Self::COMPRESSION_LEVEL,
                format!("level {level} is out of range"),
                format!("use 0 (plain files) to {MAX_COMPRESSION_LEVEL} (smallest)"),
            );
        }
    }
}

// ============================================================================
// [stylesheet] / [script]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    /// Run lightningcss over the tokenizer's output.
    pub post_process: bool,
    /// Fix relative `url()`/`@import` paths of file-based stylesheets.
    pub rewrite_urls: bool,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            post_process: true,
            rewrite_urls: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Let oxc mangle local names.
    pub mangle: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self { mangle: true }
    }
}

// ============================================================================
// tests
// ============================================================================
