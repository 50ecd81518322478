//! Asset descriptors as exchanged with the host pipeline.
//!
//! Wire shape (one entry of a collection):
//!
//! ```json
//! { "compress": true, "file": "css/main.css", "media": "all" }
//! { "compress": true, "code": "body { margin: 0 }" }
//! ```
//!
//! Keys other than `compress`, `file` and `code` are host attributes and
//! travel through untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered key → descriptor map. Output order follows input order.
pub type AssetCollection = IndexMap<String, AssetDescriptor>;

/// Where an asset's source lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Path as registered by the host (site-relative or absolute).
    File(String),
    /// Literal source text.
    Code(String),
}

/// One CSS or JS unit to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDescriptor", into = "RawDescriptor")]
pub struct AssetDescriptor {
    pub compress: bool,
    pub source: AssetSource,
    /// Host attributes, in their original order.
    pub attributes: IndexMap<String, Value>,
}

impl AssetDescriptor {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            compress: true,
            source: AssetSource::File(path.into()),
            attributes: IndexMap::new(),
        }
    }

    pub fn code(code: impl Into<String>) -> Self {
        Self {
            compress: true,
            source: AssetSource::Code(code.into()),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

#[derive(Serialize, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    compress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(flatten)]
    attributes: IndexMap<String, Value>,
}

impl TryFrom<RawDescriptor> for AssetDescriptor {
    type Error = String;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        // A present `code` makes the entry inline, whatever `file` says.
        let source = match (raw.code, raw.file) {
            (Some(code), _) => AssetSource::Code(code),
            (None, Some(file)) => AssetSource::File(file),
            (None, None) => return Err("asset descriptor needs `file` or `code`".into()),
        };
        Ok(Self {
            compress: raw.compress,
            source,
            attributes: raw.attributes,
        })
    }
}

impl From<AssetDescriptor> for RawDescriptor {
    fn from(desc: AssetDescriptor) -> Self {
        let (file, code) = match desc.source {
            AssetSource::File(file) => (Some(file), None),
            AssetSource::Code(code) => (None, Some(code)),
        };
        Self {
            compress: desc.compress,
            file,
            code,
            attributes: desc.attributes,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
