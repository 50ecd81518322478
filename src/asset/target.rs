//! Deterministic target filenames and output writing.

use std::fs;
use std::io;
use std::path::Path;

use super::AssetType;

/// Whether the gzip writer is compiled in.
pub const GZIP_AVAILABLE: bool = cfg!(feature = "gzip");

/// Compression level to gzip with, if gzip output is enabled.
///
/// Enabled iff the capability is `available` and `level` is set and
/// non-zero. Levels above 9 are clamped.
pub fn gzip_level(available: bool, level: Option<u32>) -> Option<u32> {
    match level {
        Some(level) if available && level > 0 => Some(level.min(9)),
        _ => None,
    }
}

/// `<dir>/<basename>-min.<ext>`, with `.gzip` appended when gzipping.
///
/// Only the file name of `source` matters, so the same source always maps
/// to the same target.
///
/// # Examples
/// ```text
/// css/site/main.css   → assets/compressed/main-min.css
/// js/app.js (gzip)    → assets/compressed/app-min.js.gzip
/// vendor/LICENSE      → assets/compressed/LICENSE-min.js
/// ```
pub fn target_filename(dir: &str, source: &str, kind: AssetType, gzip: bool) -> String {
    let path = Path::new(source);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(kind.default_extension());

    let dir = dir.trim_end_matches('/');
    let mut target = if dir.is_empty() {
        format!("{stem}-min.{ext}")
    } else {
        format!("{dir}/{stem}-min.{ext}")
    };
    if gzip {
        target.push_str(".gzip");
    }
    target
}

/// Write minified output, gzip-encoded when `gzip_level` is set.
pub fn write_output(path: &Path, content: &str, gzip_level: Option<u32>) -> io::Result<()> {
    match gzip_level {
        Some(level) => write_gzip(path, content, level),
        None => fs::write(path, content),
    }
}

#[cfg(feature = "gzip")]
fn write_gzip(path: &Path, content: &str, level: u32) -> io::Result<()> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let file = fs::File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::new(level));
    encoder.write_all(content.as_bytes())?;
    encoder.finish()?;
    Ok(())
}

// gzip_level() never enables gzip without the capability
#[cfg(not(feature = "gzip"))]
fn write_gzip(path: &Path, content: &str, _level: u32) -> io::Result<()> {
    fs::write(path, content)
}

// ============================================================================
// Tests
// ============================================================================
