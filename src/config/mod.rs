//! Configuration management for `min.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError, ConfigDiagnostics, FieldPath
//! ├── section    # [site], [compressor], [stylesheet], [script]
//! ├── util       # config file discovery
//! └── mod.rs     # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section          | Purpose                                        |
//! |------------------|------------------------------------------------|
//! | `[site]`         | Public root that sources and outputs live in   |
//! | `[compressor]`   | Output directory and gzip level                |
//! | `[stylesheet]`   | CSS post pass and URL fixing                   |
//! | `[script]`       | JS minifier options                            |

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{CompressorConfig, ScriptConfig, SiteSection, StylesheetConfig};

use crate::asset::{AssetMinifier, MinifyOptions, OxcMinifier, Passthrough, SiteResolver};
use crate::asset::target::GZIP_AVAILABLE;
use crate::cli::Cli;
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing min.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub compressor: CompressorConfig,

    #[serde(default)]
    pub stylesheet: StylesheetConfig,

    #[serde(default)]
    pub script: ScriptConfig,
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; without one, defaults
    /// apply with cwd as project root. CLI flags override file values.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "`{}` not found, using defaults", cli.config.display());
                Self {
                    root: cwd.clone(),
                    ..Self::default()
                }
            }
        };

        config.apply_cli(cli, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides. `--root` is relative to cwd.
    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        if let Some(root) = &cli.root {
            self.site.root = cwd.join(root);
        }
        if let Some(level) = cli.compression_level {
            self.compressor.compression_level = Some(level);
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), ignored.join(", "));
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path<'_>| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Absolute site root (`site.root` resolved against the project root).
    pub fn site_root(&self) -> PathBuf {
        self.root.join(&self.site.root).components().collect()
    }

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&self.site_root(), &mut diag);
        self.compressor.validate(&mut diag);
        diag.into_result()
    }

    /// Options for the orchestrator.
    pub fn minify_options(&self) -> MinifyOptions {
        MinifyOptions {
            compressor_dir: self.compressor.dir.clone(),
            compression_level: self.compressor.compression_level,
            gzip_available: GZIP_AVAILABLE,
            rewrite_urls: self.stylesheet.rewrite_urls,
        }
    }

    /// Orchestrator wired with this configuration's collaborators.
    pub fn minifier(&self) -> AssetMinifier {
        let minifier = AssetMinifier::new(SiteResolver::new(self.site_root()), self.minify_options())
            .with_script_minifier(OxcMinifier {
                mangle: self.script.mangle,
            });
        if self.stylesheet.post_process {
            minifier
        } else {
            minifier.with_stylesheet_minifier(Passthrough)
        }
    }
}

// ============================================================================
// tests
// ============================================================================
