//! Single-pass chunk classifier for CSS source.
//!
//! The scanner walks the input with a byte cursor and, at each position,
//! tries the chunk classes in a fixed priority order:
//!
//! ```text
//! "..."          → DoubleQuoted
//! '...'          → SingleQuoted
//! /* ... */      → Comment | HackType1 | HackType2Header (+ HackType2Body)
//! calc( ... )    → Calc
//! anything else  → Other (up to the next string, comment or calc start)
//! unterminated   → Unexpected (rest of input)
//! ```
//!
//! All delimiters are ASCII, so every chunk boundary is a valid `str`
//! boundary even when the input contains multi-byte characters.

/// A classified slice of CSS input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// `"..."` including quotes.
    DoubleQuoted(&'a str),
    /// `'...'` including quotes.
    SingleQuoted(&'a str),
    /// Comment without any backslash in its body.
    Comment(&'a str),
    /// MacIE5 hack: body contains a backslash but does not end with one.
    HackType1(&'a str),
    /// MacIE5 hack: body ends with a backslash (`/* \*/`).
    HackType2Header(&'a str),
    /// Code following a type 2 header, up to the next comment start.
    /// A plain closing comment (no backslash) is consumed with it.
    HackType2Body(&'a str),
    /// `calc` plus its balanced parenthesised argument.
    Calc(&'a str),
    /// Plain code between strings, comments and calc expressions.
    Other(&'a str),
    /// Unterminated construct; the remainder of the input.
    Unexpected(&'a str),
}

/// Iterator over the chunks of a CSS document.
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    /// Set right after a type 2 header; the next chunk is its body.
    hack_body: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            hack_body: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    /// Take everything left as an unexpected chunk.
    fn take_rest(&mut self) -> Chunk<'a> {
        let rest = &self.src[self.pos..];
        self.pos = self.src.len();
        Chunk::Unexpected(rest)
    }

    /// Advance past `src[start..end]` and return the slice.
    fn advance(&mut self, end: usize) -> &'a str {
        let text = &self.src[self.pos..end];
        self.pos = end;
        text
    }

    fn scan_string(&mut self, quote: u8) -> Chunk<'a> {
        let bytes = self.bytes();
        let mut i = self.pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b if b == quote => {
                    let text = self.advance(i + 1);
                    return if quote == b'"' {
                        Chunk::DoubleQuoted(text)
                    } else {
                        Chunk::SingleQuoted(text)
                    };
                }
                _ => i += 1,
            }
        }
        self.take_rest()
    }

    fn scan_comment(&mut self) -> Chunk<'a> {
        let body_start = self.pos + 2;
        let Some(close) = find(self.bytes(), b"*/", body_start) else {
            return self.take_rest();
        };
        let body = &self.src[body_start..close];
        let text = self.advance(close + 2);

        if !body.contains('\\') {
            Chunk::Comment(text)
        } else if body.ends_with('\\') {
            self.hack_body = true;
            Chunk::HackType2Header(text)
        } else {
            Chunk::HackType1(text)
        }
    }

    fn scan_hack_body(&mut self) -> Chunk<'a> {
        self.hack_body = false;
        let bytes = self.bytes();
        let end = find(bytes, b"/*", self.pos).unwrap_or(bytes.len());
        let body = self.advance(end);

        // Only a plain comment closes the hack. Hack comments of either
        // type are scanned on their own, unterminated ones end up unexpected.
        if end < bytes.len()
            && let Some(close) = find(bytes, b"*/", end + 2)
            && !self.src[end + 2..close].contains('\\')
        {
            self.pos = close + 2;
        }
        Chunk::HackType2Body(body)
    }

    fn scan_calc(&mut self) -> Chunk<'a> {
        let bytes = self.bytes();
        let mut depth = 0usize;
        let mut i = self.pos + CALC.len() - 1;
        while i < bytes.len() {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Chunk::Calc(self.advance(i + 1));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        self.take_rest()
    }

    fn scan_other(&mut self) -> Chunk<'a> {
        let bytes = self.bytes();
        let mut i = self.pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'"' | b'\'' => break,
                b'/' if bytes.get(i + 1) == Some(&b'*') => break,
                b'c' if is_calc_start(bytes, i) => break,
                _ => i += 1,
            }
        }
        Chunk::Other(self.advance(i))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // A type 2 header always gets a body, even an empty one at EOF.
        if self.hack_body {
            return Some(self.scan_hack_body());
        }
        if self.pos >= self.src.len() {
            return None;
        }

        let bytes = self.bytes();
        let chunk = match bytes[self.pos] {
            b'"' => self.scan_string(b'"'),
            b'\'' => self.scan_string(b'\''),
            b'/' if bytes.get(self.pos + 1) == Some(&b'*') => self.scan_comment(),
            b'c' if is_calc_start(bytes, self.pos) => self.scan_calc(),
            _ => self.scan_other(),
        };
        Some(chunk)
    }
}

/// Opening of a calc expression, parenthesis included.
const CALC: &[u8] = b"calc(";

/// `calc(` at `i`, not glued to a preceding identifier character.
fn is_calc_start(bytes: &[u8], i: usize) -> bool {
    if !bytes[i..].starts_with(CALC) {
        return false;
    }
    match i.checked_sub(1).map(|p| bytes[p]) {
        Some(prev) => !(prev.is_ascii_alphanumeric() || prev == b'_'),
        None => true,
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(src: &str) -> Vec<Chunk<'_>> {
        Scanner::new(src).collect()
    }

    #[test]
    fn test_strings_with_escapes() {
        let src = r#"a{content:"x \" y"}b{content:'it\'s'}"#;
        assert_eq!(
            chunks(src),
            vec![
                Chunk::Other("a{content:"),
                Chunk::DoubleQuoted(r#""x \" y""#),
                Chunk::Other("}b{content:"),
                Chunk::SingleQuoted(r"'it\'s'"),
                Chunk::Other("}"),
            ]
        );
    }

    #[test]
    fn test_comment_kinds() {
        assert_eq!(chunks("/* plain */"), vec![Chunk::Comment("/* plain */")]);
        assert_eq!(
            chunks(r"/* mac\ hack */"),
            vec![Chunk::HackType1(r"/* mac\ hack */")]
        );
        assert_eq!(
            chunks("/*\\*/a{}/* */b{}"),
            vec![
                Chunk::HackType2Header("/*\\*/"),
                Chunk::HackType2Body("a{}"),
                Chunk::Other("b{}"),
            ]
        );
    }

    #[test]
    fn test_hack_body_runs_to_end_without_closing_comment() {
        assert_eq!(
            chunks("/*\\*/ a { }"),
            vec![Chunk::HackType2Header("/*\\*/"), Chunk::HackType2Body(" a { }")]
        );
    }

    #[test]
    fn test_hack_header_at_end_gets_empty_body() {
        assert_eq!(
            chunks("a{}/*\\*/"),
            vec![
                Chunk::Other("a{}"),
                Chunk::HackType2Header("/*\\*/"),
                Chunk::HackType2Body(""),
            ]
        );
    }

    #[test]
    fn test_hack_body_keeps_following_header() {
        assert_eq!(
            chunks("/*\\*/a{}/*\\*/b{}"),
            vec![
                Chunk::HackType2Header("/*\\*/"),
                Chunk::HackType2Body("a{}"),
                Chunk::HackType2Header("/*\\*/"),
                Chunk::HackType2Body("b{}"),
            ]
        );
    }

    #[test]
    fn test_hack_body_keeps_following_type1() {
        assert_eq!(
            chunks("/*\\*/a{}/* mac \\ hack */b{}"),
            vec![
                Chunk::HackType2Header("/*\\*/"),
                Chunk::HackType2Body("a{}"),
                Chunk::HackType1("/* mac \\ hack */"),
                Chunk::Other("b{}"),
            ]
        );
    }

    #[test]
    fn test_calc_nested_parens() {
        let src = "width:calc(100% - (2 * 10px));";
        assert_eq!(
            chunks(src),
            vec![
                Chunk::Other("width:"),
                Chunk::Calc("calc(100% - (2 * 10px))"),
                Chunk::Other(";"),
            ]
        );
    }

    #[test]
    fn test_calc_requires_word_boundary() {
        assert_eq!(
            chunks("x:notcalc(1 + 2)"),
            vec![Chunk::Other("x:notcalc(1 + 2)")]
        );
        assert_eq!(
            chunks("x:-webkit-calc(1 + 2)"),
            vec![Chunk::Other("x:-webkit-"), Chunk::Calc("calc(1 + 2)")]
        );
    }

    #[test]
    fn test_single_slash_is_code() {
        assert_eq!(
            chunks("grid-area:1/2/3/4"),
            vec![Chunk::Other("grid-area:1/2/3/4")]
        );
    }

    #[test]
    fn test_unterminated_constructs() {
        assert_eq!(
            chunks("a{} /* open"),
            vec![Chunk::Other("a{} "), Chunk::Unexpected("/* open")]
        );
        assert_eq!(
            chunks("a{content:\"open"),
            vec![Chunk::Other("a{content:"), Chunk::Unexpected("\"open")]
        );
        assert_eq!(
            chunks("calc(1 + (2)"),
            vec![Chunk::Unexpected("calc(1 + (2)")]
        );
    }

    #[test]
    fn test_multibyte_text() {
        let src = "a::before{content:\"→ ü\"}/* é */b{}";
        assert_eq!(
            chunks(src),
            vec![
                Chunk::Other("a::before{content:"),
                Chunk::DoubleQuoted("\"→ ü\""),
                Chunk::Other("}"),
                Chunk::Comment("/* é */"),
                Chunk::Other("b{}"),
            ]
        );
    }
}
