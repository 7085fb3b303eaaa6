//! Pull tokenizer over the raw input.
//!
//! Produces one [`RawToken`] per markup construct or text run, with strict
//! well-formedness checks at the lexical level: unterminated constructs,
//! malformed names, `--` inside comments, and DOCTYPE or processing
//! instructions (neither of which this crate supports) are all errors here.
//! Structural checks (tag balance, root count) belong to the tree builder.

use std::borrow::Cow;

use crate::core::entities::decode_text;
use crate::core::scanner::Scanner;
use crate::error::ParseError;

/// A lexical token. Attribute regions are handed over raw; the reader layer
/// parses them so tokens stay cheap for constructs whose attributes nobody
/// looks at.
#[derive(Debug)]
pub enum RawToken<'a> {
    StartTag {
        /// Name as written, prefix included.
        name: &'a str,
        /// Raw slice between the name and the closing `>` (minus a trailing
        /// `/` for self-closing tags).
        attrs: &'a str,
        /// Byte offset of `attrs` within the document.
        attrs_pos: usize,
        self_closing: bool,
        pos: usize,
    },
    EndTag {
        name: &'a str,
        pos: usize,
    },
    Text {
        content: Cow<'a, str>,
        pos: usize,
    },
    CData {
        content: &'a str,
        pos: usize,
    },
    Comment {
        content: &'a str,
        pos: usize,
    },
    XmlDecl {
        attrs: &'a str,
        attrs_pos: usize,
    },
}

pub struct Tokenizer<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input.as_bytes()),
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<RawToken<'a>>, ParseError> {
        if self.scanner.is_eof() {
            return Ok(None);
        }
        if self.scanner.peek() == Some(b'<') {
            self.parse_markup().map(Some)
        } else {
            self.parse_text().map(Some)
        }
    }

    fn parse_text(&mut self) -> Result<RawToken<'a>, ParseError> {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or(self.input.len());
        self.scanner.set_position(end);
        let content = decode_text(&self.input[start..end], start)?;
        Ok(RawToken::Text {
            content,
            pos: start,
        })
    }

    fn parse_markup(&mut self) -> Result<RawToken<'a>, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(1);
        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang(start),
            Some(b'?') => self.parse_xml_decl(start),
            Some(_) => self.parse_start_tag(start),
            None => Err(ParseError::at("unexpected end of input after '<'", start)),
        }
    }

    fn parse_start_tag(&mut self, start: usize) -> Result<RawToken<'a>, ParseError> {
        let name = self.read_name_str("invalid element name", start)?;
        let attrs_start = self.scanner.position();
        let gt = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| ParseError::at(format!("unclosed tag <{name}>"), start))?;

        let self_closing = gt > attrs_start && self.input.as_bytes()[gt - 1] == b'/';
        let attrs_end = if self_closing { gt - 1 } else { gt };
        let attrs = &self.input[attrs_start..attrs_end];
        if !attrs.is_empty() && !attrs.as_bytes()[0].is_ascii_whitespace() {
            return Err(ParseError::at(
                format!("malformed start tag <{name}>"),
                start,
            ));
        }

        self.scanner.set_position(gt + 1);
        Ok(RawToken::StartTag {
            name,
            attrs,
            attrs_pos: attrs_start,
            self_closing,
            pos: start,
        })
    }

    fn parse_end_tag(&mut self, start: usize) -> Result<RawToken<'a>, ParseError> {
        self.scanner.advance(1);
        let name = self.read_name_str("invalid closing tag", start)?;
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some(b'>') => {
                self.scanner.advance(1);
                Ok(RawToken::EndTag { name, pos: start })
            }
            _ => Err(ParseError::at(
                format!("malformed closing tag </{name}>"),
                start,
            )),
        }
    }

    fn parse_bang(&mut self, start: usize) -> Result<RawToken<'a>, ParseError> {
        self.scanner.advance(1);
        if self.scanner.starts_with(b"--") {
            self.parse_comment(start)
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.parse_cdata(start)
        } else if self.scanner.starts_with(b"DOCTYPE") {
            Err(ParseError::at(
                "DOCTYPE declarations are not supported",
                start,
            ))
        } else {
            Err(ParseError::at("malformed markup after '<!'", start))
        }
    }

    fn parse_comment(&mut self, start: usize) -> Result<RawToken<'a>, ParseError> {
        self.scanner.advance(2);
        let content_start = self.scanner.position();
        let end = self
            .scanner
            .find_seq(b"-->")
            .ok_or_else(|| ParseError::at("unterminated comment", start))?;
        let content = &self.input[content_start..end];
        if content.contains("--") {
            return Err(ParseError::at(
                "'--' is not allowed inside a comment",
                start,
            ));
        }
        self.scanner.set_position(end + 3);
        Ok(RawToken::Comment {
            content,
            pos: start,
        })
    }

    fn parse_cdata(&mut self, start: usize) -> Result<RawToken<'a>, ParseError> {
        self.scanner.advance(7);
        let content_start = self.scanner.position();
        let end = self
            .scanner
            .find_seq(b"]]>")
            .ok_or_else(|| ParseError::at("unterminated CDATA section", start))?;
        let content = &self.input[content_start..end];
        self.scanner.set_position(end + 3);
        Ok(RawToken::CData {
            content,
            pos: start,
        })
    }

    fn parse_xml_decl(&mut self, start: usize) -> Result<RawToken<'a>, ParseError> {
        self.scanner.advance(1);
        let name = self.read_name_str("malformed processing instruction", start)?;
        if !name.eq_ignore_ascii_case("xml") {
            return Err(ParseError::at(
                format!("processing instruction <?{name}?> is not supported"),
                start,
            ));
        }
        if start != 0 {
            return Err(ParseError::at(
                "XML declaration is only allowed at the start of the document",
                start,
            ));
        }
        let attrs_start = self.scanner.position();
        let end = self
            .scanner
            .find_seq(b"?>")
            .ok_or_else(|| ParseError::at("unterminated XML declaration", start))?;
        let attrs = &self.input[attrs_start..end];
        self.scanner.set_position(end + 2);
        Ok(RawToken::XmlDecl {
            attrs,
            attrs_pos: attrs_start,
        })
    }

    fn read_name_str(&mut self, what: &str, pos: usize) -> Result<&'a str, ParseError> {
        let start = self.scanner.position();
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::at(what.to_string(), pos))?;
        Ok(&self.input[start..start + name.len()])
    }
}
