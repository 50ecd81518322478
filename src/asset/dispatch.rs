//! Per-entry dispatch: skip, minify inline code, or minify a file to the
//! compressor directory.
//!
//! ```text
//! compress == false ──────────────────────────────▶ copied through
//! code    ──[CSS core]──▶ external ──(+ ";")──────▶ code replaced
//! file    ──read──[CSS core ▶ url fix]──▶ external ──▶ write (plain | gzip)
//!                                                   ──▶ file = target
//! ```
//!
//! Entries are independent: a failing entry is passed through unchanged
//! and reported in [`Minified::errors`], later entries still run.

use std::fs;

use crate::css::{self, RelativeUrlRewriter, RewriteUrls};
use crate::{debug, log};

use super::error::{EntryError, MinifyError};
use super::minify::{LightningCssMinifier, Minify, OxcMinifier};
use super::resolve::ResolvePath;
use super::target::{GZIP_AVAILABLE, gzip_level, target_filename, write_output};
use super::{AssetCollection, AssetDescriptor, AssetSource, AssetType, KeyPolicy};

/// Settings the orchestrator depends on, passed in explicitly.
#[derive(Debug, Clone)]
pub struct MinifyOptions {
    /// Output directory, relative to the site root.
    pub compressor_dir: String,
    /// Gzip level 0-9; `None` or `0` disables gzip output.
    pub compression_level: Option<u32>,
    /// Whether the gzip writer may be used at all.
    pub gzip_available: bool,
    /// Fix relative `url()` references of file-based stylesheets.
    pub rewrite_urls: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            compressor_dir: "assets/compressed".into(),
            compression_level: None,
            gzip_available: GZIP_AVAILABLE,
            rewrite_urls: true,
        }
    }
}

/// Result of dispatching one collection.
#[derive(Debug, Default)]
pub struct Minified {
    pub files: AssetCollection,
    pub errors: Vec<EntryError>,
}

/// How a group of entries is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub kind: AssetType,
    /// Inline-append group: inline code gets a trailing `;`, file-based
    /// stylesheets skip URL fixing.
    pub inline: bool,
    pub keys: KeyPolicy,
}

impl Dispatch {
    pub const fn files(kind: AssetType) -> Self {
        Self {
            kind,
            inline: false,
            keys: KeyPolicy::Replace,
        }
    }

    pub const fn inline(kind: AssetType) -> Self {
        Self {
            kind,
            inline: true,
            keys: KeyPolicy::Replace,
        }
    }

    pub const fn retain_keys(self) -> Self {
        Self {
            keys: KeyPolicy::Retain,
            ..self
        }
    }
}

/// The minification orchestrator.
pub struct AssetMinifier {
    resolver: Box<dyn ResolvePath>,
    options: MinifyOptions,
    scripts: Box<dyn Minify>,
    stylesheets: Box<dyn Minify>,
    urls: Box<dyn RewriteUrls>,
}

impl AssetMinifier {
    /// Orchestrator with the default collaborators: oxc for scripts,
    /// lightningcss as stylesheet post pass, relative URL fixing.
    pub fn new(resolver: impl ResolvePath + 'static, options: MinifyOptions) -> Self {
        let urls = RelativeUrlRewriter::new(&options.compressor_dir);
        Self {
            resolver: Box::new(resolver),
            options,
            scripts: Box::new(OxcMinifier::default()),
            stylesheets: Box::new(LightningCssMinifier),
            urls: Box::new(urls),
        }
    }

    pub fn with_script_minifier(mut self, minifier: impl Minify + 'static) -> Self {
        self.scripts = Box::new(minifier);
        self
    }

    pub fn with_stylesheet_minifier(mut self, minifier: impl Minify + 'static) -> Self {
        self.stylesheets = Box::new(minifier);
        self
    }

    pub fn with_url_rewriter(mut self, urls: impl RewriteUrls + 'static) -> Self {
        self.urls = Box::new(urls);
        self
    }

    fn gzip_level(&self) -> Option<u32> {
        gzip_level(self.options.gzip_available, self.options.compression_level)
    }

    /// Process every entry of `files`, preserving order.
    pub fn minify_files(&self, files: AssetCollection, dispatch: Dispatch) -> Minified {
        let mut result = Minified::default();

        for (key, desc) in files {
            if !desc.compress {
                result.files.insert(key, desc);
                continue;
            }

            match self.minify_entry(&desc, dispatch) {
                Ok(Processed { desc, target }) => {
                    let key = match (target, dispatch.keys) {
                        (Some(target), KeyPolicy::Replace) => target,
                        _ => key,
                    };
                    result.files.insert(key, desc);
                }
                Err(error) => {
                    log!("error"; "{} `{}`: {}", dispatch.kind, key, error);
                    result.files.insert(key.clone(), desc);
                    result.errors.push(EntryError { key, error });
                }
            }
        }

        result
    }

    fn minify_entry(
        &self,
        desc: &AssetDescriptor,
        dispatch: Dispatch,
    ) -> Result<Processed, MinifyError> {
        let mut desc = desc.clone();
        desc.compress = false;

        match &desc.source {
            AssetSource::Code(code) => {
                let mut code = self.minify_code(code, dispatch.kind)?;
                if dispatch.inline {
                    code.push(';');
                }
                desc.source = AssetSource::Code(code);
                Ok(Processed { desc, target: None })
            }
            AssetSource::File(file) => {
                let target = self.minify_file(file, dispatch)?;
                desc.source = AssetSource::File(target.clone());
                Ok(Processed {
                    desc,
                    target: Some(target),
                })
            }
        }
    }

    fn minify_code(&self, code: &str, kind: AssetType) -> Result<String, MinifyError> {
        match kind {
            AssetType::Stylesheet => {
                let css = self.compress_css(code, "inline stylesheet");
                self.external(kind, &css)
            }
            AssetType::JavaScript => self.external(kind, code),
        }
    }

    /// Minify `file` into the compressor directory, returning the target
    /// filename (relative to the site root).
    fn minify_file(&self, file: &str, dispatch: Dispatch) -> Result<String, MinifyError> {
        let gzip = self.gzip_level();
        let dir = &self.options.compressor_dir;
        self.resolver
            .ensure_dir(dir)
            .map_err(|e| MinifyError::OutputWrite(self.resolver.site_root().join(dir), e))?;
        let target = target_filename(dir, file, dispatch.kind, gzip.is_some());

        let source_path = self.resolver.resolve(file);
        let bytes = fs::read(&source_path)
            .map_err(|e| MinifyError::SourceUnreadable(source_path.clone(), e))?;
        // Legacy sources may carry Latin-1 bytes, usually in comments
        let source = String::from_utf8_lossy(&bytes);

        let minified = match dispatch.kind {
            AssetType::Stylesheet => {
                let mut css = self.compress_css(&source, file);
                if !dispatch.inline && self.options.rewrite_urls {
                    let relative = self.resolver.site_relative(&source_path);
                    css = self.urls.rewrite(&css, &relative);
                }
                self.external(dispatch.kind, &css)?
            }
            AssetType::JavaScript => self.external(dispatch.kind, &source)?,
        };

        let output = self.resolver.site_root().join(&target);
        write_output(&output, &minified, gzip)
            .map_err(|e| MinifyError::OutputWrite(output.clone(), e))?;

        debug!("minify"; "{} -> {}", file, target);
        Ok(target)
    }

    fn compress_css(&self, source: &str, label: &str) -> String {
        let css = css::compress_css(source);
        if css::has_unexpected_input(&css) {
            log!("warning"; "{}: unexpected input passed through uncompressed", label);
        }
        css
    }

    fn external(&self, kind: AssetType, source: &str) -> Result<String, MinifyError> {
        let minifier = match kind {
            AssetType::Stylesheet => &self.stylesheets,
            AssetType::JavaScript => &self.scripts,
        };
        minifier.minify(source).map_err(|e| MinifyError::External {
            kind,
            message: format!("{e:#}"),
        })
    }
}

struct Processed {
    desc: AssetDescriptor,
    /// Set for file entries.
    target: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::minify::Passthrough;
    use crate::asset::resolve::SiteResolver;
    use anyhow::{Result, bail};
    use std::path::Path;
    use tempfile::TempDir;

    /// Records nothing, just tags its output.
    struct Tagged(&'static str);

    impl Minify for Tagged {
        fn minify(&self, source: &str) -> Result<String> {
            Ok(format!("{}{}", self.0, source.trim()))
        }
    }

    struct Failing;

    impl Minify for Failing {
        fn minify(&self, _source: &str) -> Result<String> {
            bail!("boom")
        }
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(
            dir.path().join("css/main.css"),
            "body {\n  margin: 0;\n  background: url(img/bg.png);\n}\n",
        )
        .unwrap();
        fs::write(dir.path().join("js/app.js"), "  run();  ").unwrap();
        dir
    }

    fn minifier(root: &Path, options: MinifyOptions) -> AssetMinifier {
        AssetMinifier::new(SiteResolver::new(root), options)
            .with_script_minifier(Tagged("js:"))
            .with_stylesheet_minifier(Passthrough)
    }

    fn collection(entries: Vec<(&str, AssetDescriptor)>) -> AssetCollection {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_skip_uncompressed() {
        let dir = site();
        let files = collection(vec![(
            "keep",
            AssetDescriptor::file("css/main.css").with_compress(false),
        )]);

        let out = minifier(dir.path(), MinifyOptions::default())
            .minify_files(files.clone(), Dispatch::files(AssetType::Stylesheet));

        assert!(out.errors.is_empty());
        assert_eq!(out.files, files);
        assert!(!dir.path().join("assets/compressed").exists());
    }

    #[test]
    fn test_stylesheet_file() {
        let dir = site();
        let files = collection(vec![("css/main.css", AssetDescriptor::file("css/main.css"))]);

        let out = minifier(dir.path(), MinifyOptions::default())
            .minify_files(files, Dispatch::files(AssetType::Stylesheet));

        assert!(out.errors.is_empty());
        let (key, desc) = out.files.get_index(0).unwrap();
        assert_eq!(key, "assets/compressed/main-min.css");
        assert!(!desc.compress);
        assert_eq!(
            desc.source,
            AssetSource::File("assets/compressed/main-min.css".into())
        );

        let written = fs::read_to_string(dir.path().join("assets/compressed/main-min.css")).unwrap();
        assert_eq!(
            written,
            "body{margin:0;background:url('../../css/img/bg.png')}\n"
        );
    }

    #[test]
    fn test_inline_group_skips_url_fix() {
        let dir = site();
        let files = collection(vec![("main", AssetDescriptor::file("css/main.css"))]);

        minifier(dir.path(), MinifyOptions::default())
            .minify_files(files, Dispatch::inline(AssetType::Stylesheet));

        let written = fs::read_to_string(dir.path().join("assets/compressed/main-min.css")).unwrap();
        assert!(written.contains("url(img/bg.png)"));
    }

    #[test]
    fn test_script_file_and_retained_key() {
        let dir = site();
        let files = collection(vec![("app", AssetDescriptor::file("js/app.js"))]);

        let out = minifier(dir.path(), MinifyOptions::default()).minify_files(
            files,
            Dispatch::files(AssetType::JavaScript).retain_keys(),
        );

        let desc = &out.files["app"];
        assert_eq!(desc.source, AssetSource::File("assets/compressed/app-min.js".into()));
        let written = fs::read_to_string(dir.path().join("assets/compressed/app-min.js")).unwrap();
        assert_eq!(written, "js:run();");
    }

    #[test]
    fn test_inline_code() {
        let dir = site();
        let scripts = collection(vec![("boot", AssetDescriptor::code("  go()  "))]);
        let styles = collection(vec![("st", AssetDescriptor::code("a { color: red; }"))]);
        let minifier = minifier(dir.path(), MinifyOptions::default());

        let out = minifier.minify_files(scripts.clone(), Dispatch::inline(AssetType::JavaScript));
        assert_eq!(out.files["boot"].source, AssetSource::Code("js:go();".into()));
        assert!(!out.files["boot"].compress);

        let out = minifier.minify_files(scripts, Dispatch::files(AssetType::JavaScript));
        assert_eq!(out.files["boot"].source, AssetSource::Code("js:go()".into()));

        let out = minifier.minify_files(styles, Dispatch::files(AssetType::Stylesheet));
        assert_eq!(out.files["st"].source, AssetSource::Code("a{color:red}\n".into()));
    }

    #[test]
    fn test_order_preserved_and_idempotent() {
        let dir = site();
        let files = collection(vec![
            ("first", AssetDescriptor::code("a()")),
            ("js/app.js", AssetDescriptor::file("js/app.js")),
            ("last", AssetDescriptor::code("b()").with_compress(false)),
        ]);
        let minifier = minifier(dir.path(), MinifyOptions::default());

        let once = minifier.minify_files(files, Dispatch::files(AssetType::JavaScript));
        let keys: Vec<_> = once.files.keys().cloned().collect();
        assert_eq!(keys, ["first", "assets/compressed/app-min.js", "last"]);

        let twice = minifier.minify_files(once.files.clone(), Dispatch::files(AssetType::JavaScript));
        assert_eq!(twice.files, once.files);
    }

    #[test]
    fn test_non_utf8_source() {
        let dir = site();
        fs::write(
            dir.path().join("css/legacy.css"),
            b"/* \xa9 2009 */\na { color: red; }\n",
        )
        .unwrap();
        let files = collection(vec![("legacy", AssetDescriptor::file("css/legacy.css"))]);

        let out = minifier(dir.path(), MinifyOptions::default())
            .minify_files(files, Dispatch::files(AssetType::Stylesheet));

        assert!(out.errors.is_empty());
        let written =
            fs::read_to_string(dir.path().join("assets/compressed/legacy-min.css")).unwrap();
        assert_eq!(written, "a{color:red}\n");
    }

    #[test]
    fn test_missing_source_is_per_entry() {
        let dir = site();
        let files = collection(vec![
            ("gone", AssetDescriptor::file("js/gone.js")),
            ("js/app.js", AssetDescriptor::file("js/app.js")),
        ]);

        let out = minifier(dir.path(), MinifyOptions::default())
            .minify_files(files, Dispatch::files(AssetType::JavaScript));

        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].key, "gone");
        assert!(matches!(out.errors[0].error, MinifyError::SourceUnreadable(..)));

        // failed entry passes through untouched, the other one is processed
        assert!(out.files["gone"].compress);
        assert!(out.files.contains_key("assets/compressed/app-min.js"));
    }

    #[test]
    fn test_external_failure() {
        let dir = site();
        let files = collection(vec![("x", AssetDescriptor::code("x"))]);

        let out = minifier(dir.path(), MinifyOptions::default())
            .with_script_minifier(Failing)
            .minify_files(files, Dispatch::inline(AssetType::JavaScript));

        assert_eq!(out.errors.len(), 1);
        assert!(matches!(
            &out.errors[0].error,
            MinifyError::External { kind: AssetType::JavaScript, message } if message == "boom"
        ));
        assert_eq!(out.files["x"].source, AssetSource::Code("x".into()));
    }

    #[test]
    fn test_plain_output_without_gzip() {
        let dir = site();
        let files = collection(vec![("app", AssetDescriptor::file("js/app.js"))]);
        let options = MinifyOptions {
            compression_level: Some(0),
            ..MinifyOptions::default()
        };

        let out = minifier(dir.path(), options).minify_files(files, Dispatch::files(AssetType::JavaScript));
        assert!(out.files.contains_key("assets/compressed/app-min.js"));

        let options = MinifyOptions {
            compression_level: Some(6),
            gzip_available: false,
            ..MinifyOptions::default()
        };
        let files = collection(vec![("app", AssetDescriptor::file("js/app.js"))]);
        let out = minifier(dir.path(), options).minify_files(files, Dispatch::files(AssetType::JavaScript));
        assert!(out.files.contains_key("assets/compressed/app-min.js"));
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn test_gzip_output() {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let dir = site();
        let files = collection(vec![("app", AssetDescriptor::file("js/app.js"))]);
        let options = MinifyOptions {
            compression_level: Some(6),
            gzip_available: true,
            ..MinifyOptions::default()
        };

        let out = minifier(dir.path(), options).minify_files(files, Dispatch::files(AssetType::JavaScript));
        assert!(out.files.contains_key("assets/compressed/app-min.js.gzip"));

        let bytes = fs::read(dir.path().join("assets/compressed/app-min.js.gzip")).unwrap();
        let mut decoded = String::new();
        GzDecoder::new(&bytes[..]).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "js:run();");
    }
}
