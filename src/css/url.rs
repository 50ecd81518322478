//! Relative URL fixing for stylesheets that move to the compressor directory.
//!
//! A stylesheet at `css/site/main.css` referencing `url(img/bg.png)` must,
//! once written to `assets/compressed/main-min.css`, reference
//! `../../css/site/img/bg.png` instead.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Rewrites relative references in compressed CSS.
pub trait RewriteUrls {
    /// `source` is the stylesheet's path relative to the site root.
    fn rewrite(&self, css: &str, source: &str) -> String;
}

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[uU][rR][lL]\([ \t\n]*["']?([^"')]*)["']?[ \t\n]*\)"#).unwrap()
});

static RE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@[iI][mM][pP][oO][rR][tT][ \t\n]*["']([^"']+)["']"#).unwrap()
});

/// Prefixes relative `url()` and quoted `@import` targets with the path
/// from the output directory back to the source stylesheet's directory.
#[derive(Debug, Clone)]
pub struct RelativeUrlRewriter {
    /// `../` repeated once per segment of the output directory.
    up: String,
}

impl RelativeUrlRewriter {
    /// `output_dir` is relative to the site root, e.g. `assets/compressed`.
    pub fn new(output_dir: &str) -> Self {
        let depth = output_dir
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .count();
        Self {
            up: "../".repeat(depth),
        }
    }

    fn new_dir(&self, source: &str) -> String {
        match source.trim_start_matches('/').rsplit_once('/') {
            Some((dir, _)) => format!("{}{dir}/", self.up),
            None => self.up.clone(),
        }
    }
}

impl RewriteUrls for RelativeUrlRewriter {
    fn rewrite(&self, css: &str, source: &str) -> String {
        let new_dir = self.new_dir(source);

        let css = RE_URL.replace_all(css, |caps: &Captures<'_>| {
            let target = caps[1].trim();
            if is_rewritable(target) {
                format!("url('{}')", resolve_back_path(&format!("{new_dir}{target}")))
            } else {
                caps[0].to_string()
            }
        });

        RE_IMPORT
            .replace_all(&css, |caps: &Captures<'_>| {
                let target = caps[1].trim();
                if is_rewritable(target) {
                    format!("@import \"{}\"", resolve_back_path(&format!("{new_dir}{target}")))
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }
}

/// Root-relative, fragment-only, and anything with a scheme (`data:`,
/// `https:`) stays as written.
fn is_rewritable(target: &str) -> bool {
    !target.is_empty() && !target.starts_with('/') && !target.starts_with('#') && !target.contains(':')
}

/// Resolve `.` and `..` segments; leading `..` that cannot be resolved are
/// kept.
///
/// ```text
/// ../../css/site/../img/a.png  →  ../../css/img/a.png
/// ```
fn resolve_back_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." | "" => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            _ => parts.push(segment),
        }
    }
    parts.join("/")
}

// ============================================================================
// Tests
// ============================================================================
