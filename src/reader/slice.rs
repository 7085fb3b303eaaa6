//! Zero-copy reader over an in-memory document.
//!
//! Turns raw tokens into [`XmlEvent`]s: attribute regions get parsed, element
//! names get split into prefix and local part, and the XML declaration gets
//! its fields extracted.

use crate::core::attributes::parse_attributes;
use crate::core::split_qname;
use crate::core::tokenizer::{RawToken, Tokenizer};
use crate::error::ParseError;
use crate::reader::events::{EndElement, StartElement, XmlEvent};

pub struct SliceReader<'a> {
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a str) -> Self {
        SliceReader {
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Next event, or `None` at end of input.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, ParseError> {
        let token = match self.tokenizer.next_token()? {
            Some(token) => token,
            None => return Ok(None),
        };
        let event = match token {
            RawToken::StartTag {
                name,
                attrs,
                attrs_pos,
                self_closing,
                pos,
            } => {
                let attributes = parse_attributes(attrs, attrs_pos)?;
                let (prefix, local_name) = split_qname(name, pos + 1)?;
                let element = StartElement {
                    name,
                    prefix,
                    local_name,
                    attributes,
                    position: pos,
                };
                if self_closing {
                    XmlEvent::EmptyElement(element)
                } else {
                    XmlEvent::StartElement(element)
                }
            }
            RawToken::EndTag { name, pos } => {
                // validate the shape even though matching uses the full name
                split_qname(name, pos + 2)?;
                XmlEvent::EndElement(EndElement {
                    name,
                    position: pos,
                })
            }
            RawToken::Text { content, pos } => XmlEvent::Text {
                content,
                position: pos,
            },
            RawToken::CData { content, pos } => XmlEvent::CData {
                content,
                position: pos,
            },
            RawToken::Comment { content, .. } => XmlEvent::Comment(content),
            RawToken::XmlDecl { attrs, attrs_pos } => {
                let attrs = parse_attributes(attrs, attrs_pos)?;
                let find = |name: &str| {
                    attrs
                        .iter()
                        .find(|a| a.name == name)
                        .map(|a| a.value.as_ref().to_string())
                };
                XmlEvent::XmlDeclaration {
                    version: find("version").unwrap_or_else(|| "1.0".to_string()),
                    encoding: find("encoding"),
                    standalone: find("standalone").map(|v| v == "yes"),
                }
            }
        };
        Ok(Some(event))
    }
}
