//! Attribute parsing from the inside of a start tag.

use std::borrow::Cow;

use crate::core::entities::decode_text;
use crate::core::scanner::{is_name_char, is_name_start_char};
use crate::core::split_qname;
use crate::error::ParseError;

/// An attribute as written in the source, value entity-decoded.
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// The full name, prefix included.
    pub name: &'a str,
    pub prefix: Option<&'a str>,
    pub local_name: &'a str,
    pub value: Cow<'a, str>,
}

/// Parses the attribute region of a tag (everything between the element name
/// and the closing `>`).
///
/// Values must be quoted; unquoted values, missing `=`, a literal `<` inside
/// a value, and duplicate names are all rejected. `base` is the byte offset
/// of `input` within the document.
pub fn parse_attributes(input: &str, base: usize) -> Result<Vec<Attribute<'_>>, ParseError> {
    let bytes = input.as_bytes();
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut pos = 0;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        if !is_name_start_char(bytes[pos]) {
            return Err(ParseError::at(
                "malformed attribute: name must start with a letter or underscore",
                base + pos,
            ));
        }
        let name_start = pos;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            return Err(ParseError::at(
                format!("attribute '{name}' is missing a value"),
                base + name_start,
            ));
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        if pos >= bytes.len() || (bytes[pos] != b'"' && bytes[pos] != b'\'') {
            return Err(ParseError::at(
                format!("attribute '{name}' value must be quoted"),
                base + name_start,
            ));
        }
        let quote = bytes[pos];
        pos += 1;
        let value_start = pos;
        while pos < bytes.len() && bytes[pos] != quote {
            if bytes[pos] == b'<' {
                return Err(ParseError::at(
                    "'<' is not allowed inside an attribute value",
                    base + pos,
                ));
            }
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(ParseError::at(
                format!("attribute '{name}' has an unterminated value"),
                base + name_start,
            ));
        }
        let value = decode_text(&input[value_start..pos], base + value_start)?;
        pos += 1;

        if attrs.iter().any(|a| a.name == name) {
            return Err(ParseError::at(
                format!("duplicate attribute '{name}'"),
                base + name_start,
            ));
        }
        let (prefix, local_name) = split_qname(name, base + name_start)?;
        attrs.push(Attribute {
            name,
            prefix,
            local_name,
            value,
        });
    }

    Ok(attrs)
}
