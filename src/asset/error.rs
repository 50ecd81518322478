//! Minification error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::AssetType;

/// Failure while processing a single asset entry.
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("cannot read source `{}`", .0.display())]
    SourceUnreadable(PathBuf, #[source] io::Error),

    #[error("cannot write `{}`", .0.display())]
    OutputWrite(PathBuf, #[source] io::Error),

    #[error("{kind} minifier failed: {message}")]
    External { kind: AssetType, message: String },
}

/// A failed entry, reported next to the processed collection.
#[derive(Debug)]
pub struct EntryError {
    /// Collection key of the entry (unchanged in the output).
    pub key: String,
    pub error: MinifyError,
}
