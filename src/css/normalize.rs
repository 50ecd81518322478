//! Document-level whitespace normalization, run once after classification.

use super::clean::is_space;

/// Normalize line structure of a compressed document.
///
/// 1. leading whitespace is removed
/// 2. `[ \t]* \n <whitespace>*` becomes a single `\n`
/// 3. trailing whitespace is replaced by exactly one `\n` (empty stays empty)
pub fn normalize(doc: &str) -> String {
    let doc = doc.trim_start_matches(is_space);
    let mut out = String::with_capacity(doc.len());
    let mut blanks = String::new();
    let mut chars = doc.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => blanks.push(c),
            '\n' => {
                blanks.clear();
                out.push('\n');
                while chars.next_if(|&c| is_space(c)).is_some() {}
            }
            _ => {
                out.push_str(&blanks);
                blanks.clear();
                out.push(c);
            }
        }
    }
    out.push_str(&blanks);

    let kept = out.trim_end_matches(is_space).len();
    if kept == 0 {
        return String::new();
    }
    out.truncate(kept);
    out.push('\n');
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(normalize("\n\n  \ta{}"), "a{}\n");
    }

    #[test]
    fn test_line_runs_collapse() {
        assert_eq!(normalize("a{}  \t\n \n\n\t  b{}"), "a{}\nb{}\n");
        assert_eq!(normalize("a{}\n\n\n\n\n\nb{}"), "a{}\nb{}\n");
    }

    #[test]
    fn test_inline_blanks_kept() {
        assert_eq!(normalize("a b\tc"), "a b\tc\n");
    }

    #[test]
    fn test_trailing_newline() {
        assert_eq!(normalize("a{}"), "a{}\n");
        assert_eq!(normalize("a{}\n\n  "), "a{}\n");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t\n"), "");
    }
}
