//! Asset kind definitions.

use std::fmt;

/// Kind of asset being minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    /// CSS: tokenizing core, then the external stylesheet pass.
    Stylesheet,
    /// JavaScript: external minifier only.
    JavaScript,
}

impl AssetType {
    /// Extension used for targets whose source has none.
    pub const fn default_extension(self) -> &'static str {
        match self {
            Self::Stylesheet => "css",
            Self::JavaScript => "js",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stylesheet => "CSS",
            Self::JavaScript => "JS",
        })
    }
}

/// How output keys are chosen for file entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// The key becomes the generated target filename.
    #[default]
    Replace,
    /// The caller's key is kept (asset-collector entries).
    Retain,
}
