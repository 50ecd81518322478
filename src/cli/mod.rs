//! Command handlers.
//!
//! | Command | Output                                      |
//! |---------|---------------------------------------------|
//! | `css`   | CSS core output on stdout                   |
//! | `js`    | minified script on stdout                   |
//! | `run`   | rewritten manifest as JSON (stdout or file) |

mod args;

pub use args::{Cli, Commands};

use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::asset::{EntryError, Minify, OxcMinifier, PageAssets};
use crate::config::SiteConfig;
use crate::css::{compress_css, has_unexpected_input};
use crate::log;

/// Print the CSS core output for one stylesheet.
pub fn run_css(file: &Path) -> Result<()> {
    let source = read_input(file)?;
    let output = compress_css(&source);
    if has_unexpected_input(&output) {
        log!("warning"; "{}: unexpected input passed through uncompressed", file.display());
    }
    write_stdout(&output)
}

/// Print the minified form of one script.
pub fn run_js(file: &Path, config: &SiteConfig) -> Result<()> {
    let source = read_input(file)?;
    let minifier = OxcMinifier {
        mangle: config.script.mangle,
    };
    let output = minifier
        .minify(&source)
        .with_context(|| format!("Failed to minify {}", file.display()))?;
    write_stdout(&output)
}

/// Process a page asset manifest and emit the rewritten one.
///
/// The manifest is always written; entry failures turn into a non-zero
/// exit afterwards.
pub fn run_manifest(manifest: &Path, output: Option<&Path>, config: &SiteConfig) -> Result<()> {
    let content = read_input(manifest)?;
    let mut page: PageAssets = serde_json::from_str(&content)
        .with_context(|| format!("Invalid manifest {}", manifest.display()))?;

    let errors = config.minifier().minify_page(&mut page);

    let formatted = serde_json::to_string_pretty(&page)?;
    if let Some(path) = output {
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writeln!(file, "{formatted}")?;
        log!("minify"; "wrote manifest to {}", path.display());
    } else {
        write_stdout(&format!("{formatted}\n"))?;
    }

    report(&errors)
}

fn report(errors: &[EntryError]) -> Result<()> {
    match errors.len() {
        0 => {
            log!("done"; "all entries processed");
            Ok(())
        }
        1 => bail!("1 entry failed"),
        n => bail!("{n} entries failed"),
    }
}

/// Read a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
