//! External minifiers for JS and CSS.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Both are black boxes
//! behind [`Minify`]; the orchestrator only sees text in, text out.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// A source-to-source minifier.
pub trait Minify {
    fn minify(&self, source: &str) -> Result<String>;
}

/// JavaScript minifier backed by oxc.
///
/// Sources are parsed as classic scripts: page scripts share one global
/// scope, so top-level names are never mangled.
#[derive(Debug, Clone)]
pub struct OxcMinifier {
    pub mangle: bool,
}

impl Default for OxcMinifier {
    fn default() -> Self {
        Self { mangle: true }
    }
}

impl Minify for OxcMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        let allocator = Allocator::default();
        let source_type = SourceType::cjs();
        let ret = Parser::new(&allocator, source, source_type).parse();
        if let Some(error) = ret.errors.first() {
            return Err(anyhow!("{error}"));
        }
        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: self.mangle.then(MangleOptions::default),
            compress: Some(CompressOptions::smallest()),
        };
        let ret = Minifier::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}

/// Stylesheet post pass backed by lightningcss.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightningCssMinifier;

impl Minify for LightningCssMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        let stylesheet =
            StyleSheet::parse(source, ParserOptions::default()).map_err(|e| anyhow!("{e}"))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| anyhow!("{e}"))?;
        Ok(result.code)
    }
}

/// Leaves text as it is (external pass disabled).
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Minify for Passthrough {
    fn minify(&self, source: &str) -> Result<String> {
        Ok(source.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oxc_minifies_script() {
        let source = "function greet(name) {\n    var message = 'hello ' + name;\n    return message;\n}\nwindow.greeting = greet('world');\n";
        let out = OxcMinifier::default().minify(source).unwrap();
        assert!(out.len() < source.len());
        assert!(out.contains("window.greeting"));
    }

    #[test]
    fn test_oxc_syntax_error() {
        assert!(OxcMinifier::default().minify("function (").is_err());
    }

    #[test]
    fn test_lightningcss_pass() {
        let out = LightningCssMinifier.minify("a{color:#ff0000}\nb{margin:0 0 0 0}\n").unwrap();
        assert_eq!(out, "a{color:red}b{margin:0}");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(Passthrough.minify("a  b").unwrap(), "a  b");
    }
}
