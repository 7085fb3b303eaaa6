//! Event types for pull-parser style XML processing.
//!
//! Events borrow from the input wherever the source text needs no rewriting;
//! decoded text carries a `Cow` that only allocates when entities were
//! present.

use std::borrow::Cow;

use crate::core::attributes::Attribute;

#[derive(Debug, Clone)]
pub enum XmlEvent<'a> {
    StartElement(StartElement<'a>),
    /// A self-closing tag. Equivalent to a start followed by an immediate
    /// end, but reported as one event.
    EmptyElement(StartElement<'a>),
    EndElement(EndElement<'a>),
    Text {
        content: Cow<'a, str>,
        position: usize,
    },
    CData {
        content: &'a str,
        position: usize,
    },
    Comment(&'a str),
    XmlDeclaration {
        version: String,
        encoding: Option<String>,
        standalone: Option<bool>,
    },
}

#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Name as written, prefix included.
    pub name: &'a str,
    pub prefix: Option<&'a str>,
    pub local_name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
    /// Byte offset of the opening `<`.
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct EndElement<'a> {
    /// Name as written, prefix included.
    pub name: &'a str,
    pub position: usize,
}
