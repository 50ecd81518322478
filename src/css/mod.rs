//! Tokenizing CSS compressor.
//!
//! A single pass over the source classifies every chunk (strings, comments,
//! MacIE5 hacks, `calc()` and plain code), replaces it, and a final
//! normalization fixes up line structure:
//!
//! ```text
//! source ──strip \r──▶ Scanner ──Chunk──▶ replace ──▶ normalize ──▶ output
//! ```
//!
//! | Chunk             | Replacement                                  |
//! |-------------------|----------------------------------------------|
//! | strings, calc     | verbatim                                     |
//! | comment           | `\n`                                         |
//! | hack type 1       | `\n/*\T1*/\n`                                |
//! | hack type 2       | `\n/*T2\*/` body `\n/*T2E*/\n`               |
//! | other code        | whitespace cleaned                           |
//! | unexpected        | verbatim plus [`UNEXPECTED_MARKER`]          |
//!
//! This is not a CSS parser; see `clean` for exactly which whitespace goes.

mod clean;
mod normalize;
mod scan;
pub mod url;

use clean::CalcEdges;

pub use scan::{Chunk, Scanner};
pub use url::{RelativeUrlRewriter, RewriteUrls};

/// Appended after input the scanner could not classify.
pub const UNEXPECTED_MARKER: &str = "\n/* ERROR! Unexpected input in CSS compressor */\n";

/// Compress CSS source text.
pub fn compress_css(source: &str) -> String {
    let source = source.replace('\r', "");
    let mut out = String::with_capacity(source.len());
    let mut chunks = Scanner::new(&source).peekable();
    let mut prev = None;
    while let Some(chunk) = chunks.next() {
        let edges = CalcEdges {
            after_calc: matches!(prev, Some(Chunk::Calc(_))),
            before_calc: matches!(chunks.peek(), Some(Chunk::Calc(_))),
        };
        replace_chunk(chunk, edges, &mut out);
        prev = Some(chunk);
    }
    normalize::normalize(&out)
}

/// Whether compressed output carries the unexpected-input marker.
pub fn has_unexpected_input(compressed: &str) -> bool {
    compressed.contains(UNEXPECTED_MARKER.trim())
}

fn replace_chunk(chunk: Chunk<'_>, edges: CalcEdges, out: &mut String) {
    match chunk {
        Chunk::DoubleQuoted(s) | Chunk::SingleQuoted(s) | Chunk::Calc(s) => out.push_str(s),
        Chunk::Comment(_) => out.push('\n'),
        Chunk::HackType1(_) => out.push_str("\n/*\\T1*/\n"),
        Chunk::HackType2Header(_) => out.push_str("\n/*T2\\*/"),
        Chunk::HackType2Body(body) => {
            out.push_str(&clean::clean_hack_body(body));
            out.push_str("\n/*T2E*/\n");
        }
        Chunk::Other(code) => out.push_str(&clean::clean_code(code, edges)),
        Chunk::Unexpected(rest) => {
            out.push_str(rest);
            out.push_str(UNEXPECTED_MARKER);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_removed() {
        assert_eq!(
            compress_css("a { color: red; /* comment */ }"),
            "a{color:red;\n}\n"
        );
        assert_eq!(compress_css("/* header */\na { color: red; }"), "a{color:red}\n");
    }

    #[test]
    fn test_string_protected() {
        let css = "a::after { content: \"x {  y ; }\"; font-family: 'A  B', serif; }";
        let out = compress_css(css);
        assert!(out.contains("\"x {  y ; }\""));
        assert!(out.contains("'A  B'"));
        assert_eq!(
            out,
            "a::after{content:\"x {  y ; }\";font-family:'A  B',serif}\n"
        );
    }

    #[test]
    fn test_calc_untouched() {
        let out = compress_css("div {\n  width: calc(100% - 10px);\n}\n");
        assert!(out.contains("calc(100% - 10px)"));
        assert_eq!(out, "div{width:calc(100% - 10px)}\n");
    }

    #[test]
    fn test_calc_keeps_separating_spaces() {
        assert_eq!(
            compress_css("a { margin: 10px calc(1px + 2px) 0; }"),
            "a{margin:10px calc(1px + 2px) 0}\n"
        );
        assert_eq!(
            compress_css("a { margin: calc(1px) calc(2px) ; }"),
            "a{margin:calc(1px) calc(2px)}\n"
        );
        assert_eq!(
            compress_css("a { width: max(1px, calc(2px * 3)) }"),
            "a{width:max(1px,calc(2px * 3))}\n"
        );
    }

    #[test]
    fn test_hack_type1_marker() {
        let css = "a { color: red; }\n/* mac \\ hack */\nb { color: blue; }";
        let out = compress_css(css);
        assert_eq!(out, "a{color:red}\n/*\\T1*/\nb{color:blue}\n");
    }

    #[test]
    fn test_hack_type1_replacement_verbatim() {
        let mut out = String::new();
        replace_chunk(Chunk::HackType1("/* x\\y */"), CalcEdges::default(), &mut out);
        assert_eq!(out, "\n/*\\T1*/\n");
    }

    #[test]
    fn test_hack_type2_wraps_body() {
        let css = "/*\\*/\na { color : red ; }\n/* */\nb{}";
        assert_eq!(
            compress_css(css),
            "/*T2\\*/\na{color :red}\n/*T2E*/\nb{}\n"
        );
    }

    #[test]
    fn test_hack_type2_followed_by_type1() {
        let css = "/*\\*/\na { x: 1 }\n/* mac \\ hack */\nb { y: 2 }";
        assert_eq!(
            compress_css(css),
            "/*T2\\*/\na{x:1}\n/*T2E*/\n/*\\T1*/\nb{y:2}\n"
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        let css = "a { x: 1 }\n/* one */\n\n\n\n\n/* two */\nb { y: 2 }";
        assert_eq!(compress_css(css), "a{x:1}\nb{y:2}\n");
    }

    #[test]
    fn test_carriage_returns_stripped() {
        assert_eq!(compress_css("a {\r\n  x: 1;\r\n}\r\n"), "a{x:1}\n");
    }

    #[test]
    fn test_idempotent_on_compressed_output() {
        let css = "@media (max-width: 600px) {\n  a > b + c, d { margin: 0 auto; }\n}\n";
        let once = compress_css(css);
        assert_eq!(compress_css(&once), once);
    }

    #[test]
    fn test_fixpoint_after_comment_removal() {
        let twice = compress_css(&compress_css("a { color: red; /* c */ }"));
        assert_eq!(compress_css(&twice), twice);
    }

    #[test]
    fn test_unexpected_input_marked() {
        let out = compress_css("a { color: red; }\n/* never closed");
        assert!(out.starts_with("a{color:red}\n/* never closed\n"));
        assert!(has_unexpected_input(&out));
        assert!(!has_unexpected_input(&compress_css("a{}")));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compress_css(""), "");
        assert_eq!(compress_css("/* only a comment */"), "");
    }
}
