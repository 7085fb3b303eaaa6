//! Byte-level scanning over the raw XML input.
//!
//! Delimiter searches go through memchr so the hot paths (finding the next
//! `<`, the closing quote of an attribute, a `-->` or `]]>` terminator) use
//! SIMD where the platform has it.

use memchr::memchr;
use memchr::memmem;

/// Cursor over the input bytes. Positions are byte offsets from the start of
/// the document and always land on character boundaries, since every
/// delimiter the scanner stops at is ASCII.
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Next occurrence of `byte` at or after the cursor, as an absolute
    /// offset.
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Next occurrence of `needle` at or after the cursor, as an absolute
    /// offset.
    #[inline]
    pub fn find_seq(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.input[self.pos..], needle).map(|i| self.pos + i)
    }

    /// Position of the next `>` that is not inside a quoted attribute value.
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;
        let mut in_single_quote = false;
        let mut in_double_quote = false;

        while pos < self.input.len() {
            match self.input[pos] {
                b'"' if !in_single_quote => in_double_quote = !in_double_quote,
                b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
                b'>' if !in_single_quote && !in_double_quote => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Reads an XML name and advances past it. Returns `None` without moving
    /// when the cursor is not on a name start character.
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        match self.input.get(start) {
            Some(&first) if is_name_start_char(first) => {}
            _ => return None,
        }
        self.pos += 1;
        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }
}

/// Valid first byte of an XML name. Multi-byte UTF-8 sequences are accepted
/// wholesale; their bytes are all >= 0x80.
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Valid continuation byte of an XML name.
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_byte_is_absolute() {
        let mut scanner = Scanner::new(b"hello <world>");
        scanner.advance(2);
        assert_eq!(scanner.find_byte(b'<'), Some(6));
    }

    #[test]
    fn tag_end_skips_quoted_gt() {
        let scanner = Scanner::new(b"<a attr=\">test\">content");
        assert_eq!(scanner.find_tag_end_quoted(), Some(15));
    }

    #[test]
    fn read_name_stops_at_delimiter() {
        let mut scanner = Scanner::new(b"element-name>");
        assert_eq!(scanner.read_name(), Some(b"element-name" as &[u8]));
        assert_eq!(scanner.position(), 12);
    }

    #[test]
    fn read_name_rejects_digit_start() {
        let mut scanner = Scanner::new(b"1abc");
        assert_eq!(scanner.read_name(), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn find_seq_locates_comment_close() {
        let scanner = Scanner::new(b"<!-- x --> rest");
        assert_eq!(scanner.find_seq(b"-->"), Some(7));
    }

    #[test]
    fn skip_whitespace_covers_all_xml_space() {
        let mut scanner = Scanner::new(b"  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
    }
}
