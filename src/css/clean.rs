//! Whitespace cleanup for code chunks (outside strings, comments and calc).

/// Characters that absorb whitespace in front of them.
const PRE_PUNCT: &[char] = &['+', '>', '{', '}', ';', ',', ')'];
/// Characters that absorb whitespace behind them.
const POST_PUNCT: &[char] = &['+', '>', '{', '}', ':', ';', ',', '('];

/// Whitespace as understood by the compressor: space, `\t`, `\n`, `\v`,
/// `\f` and `\r`.
#[inline]
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Calc expressions directly around an "other code" chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalcEdges {
    /// The chunk follows a `calc()`.
    pub after_calc: bool,
    /// The chunk precedes a `calc()`.
    pub before_calc: bool,
}

/// Full cleanup of an "other code" chunk.
///
/// Both ends are trimmed, except that one space survives on a side facing
/// a `calc()` when it separated two value tokens:
///
/// ```text
/// "  a  { color: red ; }  "  →  "a{color:red}\n"
/// " 10px " (between calcs)   →  " 10px "
/// ```
pub fn clean_code(code: &str, edges: CalcEdges) -> String {
    let trimmed = code.trim_matches(is_space);
    let cleaned = tighten(&collapse_runs(trimmed));
    if cleaned.is_empty() {
        return if edges.after_calc && edges.before_calc {
            " ".to_string()
        } else {
            String::new()
        };
    }

    let lead = edges.after_calc && code.starts_with(is_space) && !cleaned.starts_with(PRE_PUNCT);
    let trail = edges.before_calc
        && code.ends_with(is_space)
        && !cleaned.ends_with(POST_PUNCT)
        && !cleaned.ends_with('\n');

    let mut out = String::with_capacity(cleaned.len() + 2);
    if lead {
        out.push(' ');
    }
    out.push_str(&cleaned);
    if trail {
        out.push(' ');
    }
    out
}

/// Cleanup of a MacIE5 type 2 hack body: punctuation rules only, the body
/// keeps its surrounding whitespace and single line breaks.
pub fn clean_hack_body(code: &str) -> String {
    tighten(code)
}

fn tighten(code: &str) -> String {
    break_after_blocks(&strip_after(&strip_before(code, PRE_PUNCT), POST_PUNCT))
}

/// Replace every run of two or more whitespace characters with one space.
/// A single whitespace character is left as it is.
fn collapse_runs(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut run = String::new();
    for c in code.chars() {
        if is_space(c) {
            run.push(c);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(c);
    }
    flush_run(&mut out, &mut run);
    out
}

fn flush_run(out: &mut String, run: &mut String) {
    match run.chars().count() {
        0 => {}
        1 => out.push_str(run),
        _ => out.push(' '),
    }
    run.clear();
}

/// Drop whitespace directly before any of `punct`.
fn strip_before(code: &str, punct: &[char]) -> String {
    let mut out = String::with_capacity(code.len());
    let mut run = String::new();
    for c in code.chars() {
        if is_space(c) {
            run.push(c);
            continue;
        }
        if !punct.contains(&c) {
            out.push_str(&run);
        }
        run.clear();
        out.push(c);
    }
    out.push_str(&run);
    out
}

/// Drop whitespace directly after any of `punct`.
fn strip_after(code: &str, punct: &[char]) -> String {
    let mut out = String::with_capacity(code.len());
    let mut skipping = false;
    for c in code.chars() {
        if is_space(c) && skipping {
            continue;
        }
        skipping = punct.contains(&c);
        out.push(c);
    }
    out
}

/// `;}` and `}` both become `}` followed by a line break.
fn break_after_blocks(code: &str) -> String {
    let mut out = String::with_capacity(code.len() + 8);
    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ';' if chars.peek() == Some(&'}') => {}
            '}' => out.push_str("}\n"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
