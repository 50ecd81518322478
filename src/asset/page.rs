//! Named asset groups of one page render, and their dispatch rules.
//!
//! | Group              | Kind | Dispatch               |
//! |--------------------|------|------------------------|
//! | `jsLibs`           | JS   | files                  |
//! | `jsFiles`          | JS   | files                  |
//! | `jsFooterFiles`    | JS   | files                  |
//! | `jsInline`         | JS   | inline (`;` appended)  |
//! | `jsFooterInline`   | JS   | inline (`;` appended)  |
//! | `cssLibs`          | CSS  | files                  |
//! | `cssFiles`         | CSS  | files                  |
//! | `cssInline`        | CSS  | files                  |
//! | `collector.*`      | both | keys retained          |

use serde::{Deserialize, Serialize};

use super::dispatch::{AssetMinifier, Dispatch};
use super::error::EntryError;
use super::{AssetCollection, AssetType};

/// Asset collections handed over by the host for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageAssets {
    pub js_libs: AssetCollection,
    pub js_files: AssetCollection,
    pub js_footer_files: AssetCollection,
    pub js_inline: AssetCollection,
    pub js_footer_inline: AssetCollection,
    pub css_libs: AssetCollection,
    pub css_files: AssetCollection,
    pub css_inline: AssetCollection,
    /// Entries registered by name through the host's asset collector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collector: Option<CollectorAssets>,
}

/// Asset-collector groups; their keys are looked up again by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectorAssets {
    pub java_scripts: AssetCollection,
    pub inline_java_scripts: AssetCollection,
    pub style_sheets: AssetCollection,
    pub inline_style_sheets: AssetCollection,
}

impl AssetMinifier {
    /// Minify all script groups in place.
    pub fn minify_javascript(&self, page: &mut PageAssets) -> Vec<EntryError> {
        let files = Dispatch::files(AssetType::JavaScript);
        let inline = Dispatch::inline(AssetType::JavaScript);

        let mut errors = Vec::new();
        self.minify_group(&mut page.js_libs, files, &mut errors);
        self.minify_group(&mut page.js_files, files, &mut errors);
        self.minify_group(&mut page.js_footer_files, files, &mut errors);
        self.minify_group(&mut page.js_inline, inline, &mut errors);
        self.minify_group(&mut page.js_footer_inline, inline, &mut errors);
        errors
    }

    /// Minify all stylesheet groups in place.
    pub fn minify_stylesheet(&self, page: &mut PageAssets) -> Vec<EntryError> {
        let files = Dispatch::files(AssetType::Stylesheet);

        let mut errors = Vec::new();
        self.minify_group(&mut page.css_libs, files, &mut errors);
        self.minify_group(&mut page.css_files, files, &mut errors);
        self.minify_group(&mut page.css_inline, files, &mut errors);
        errors
    }

    /// Minify asset-collector groups in place, keeping their keys.
    pub fn minify_collector(&self, collector: &mut CollectorAssets) -> Vec<EntryError> {
        let scripts = Dispatch::files(AssetType::JavaScript).retain_keys();
        let inline_scripts = Dispatch::inline(AssetType::JavaScript).retain_keys();
        let styles = Dispatch::files(AssetType::Stylesheet).retain_keys();

        let mut errors = Vec::new();
        self.minify_group(&mut collector.java_scripts, scripts, &mut errors);
        self.minify_group(&mut collector.inline_java_scripts, inline_scripts, &mut errors);
        self.minify_group(&mut collector.style_sheets, styles, &mut errors);
        self.minify_group(&mut collector.inline_style_sheets, styles, &mut errors);
        errors
    }

    /// Stylesheets, scripts, then collector groups.
    pub fn minify_page(&self, page: &mut PageAssets) -> Vec<EntryError> {
        let mut errors = self.minify_stylesheet(page);
        errors.extend(self.minify_javascript(page));
        if let Some(collector) = page.collector.as_mut() {
            errors.extend(self.minify_collector(collector));
        }
        errors
    }

    fn minify_group(
        &self,
        group: &mut AssetCollection,
        dispatch: Dispatch,
        errors: &mut Vec<EntryError>,
    ) {
        let minified = self.minify_files(std::mem::take(group), dispatch);
        *group = minified.files;
        errors.extend(minified.errors);
    }
}

// ============================================================================
// Tests
// ============================================================================
