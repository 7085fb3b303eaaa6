//! Error types shared across the crate.

use std::fmt;

use thiserror::Error;

/// Error raised while tokenizing or building the document tree.
///
/// Carries a human-readable message and, when the failing construct can be
/// located, the byte offset into the input where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Option<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position: Some(position),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at offset {}", self.message, pos),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Error raised when a document tree cannot be written back out. These point
/// at broken tree state (dangling ids, prefixes with no declaration in scope)
/// rather than bad user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SerializeError(pub String);

/// Top-level error returned by [`mask_xml`](crate::mask_xml).
#[derive(Debug, Clone, Error)]
pub enum MaskError {
    /// The supplied options are invalid; nothing was parsed.
    #[error("invalid options: {0}")]
    Validation(String),

    /// The input is not well-formed XML.
    #[error("XML parse error: {0}")]
    Parse(#[from] ParseError),

    /// The masked tree could not be serialized.
    #[error("serialize error: {0}")]
    Internal(#[from] SerializeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_offset() {
        let err = ParseError::at("unclosed tag <a>", 12);
        assert_eq!(err.to_string(), "unclosed tag <a> at offset 12");

        let err = ParseError::new("document has no root element");
        assert_eq!(err.to_string(), "document has no root element");
    }

    #[test]
    fn mask_error_wraps_parse_error() {
        let err = MaskError::from(ParseError::at("bad", 3));
        assert_eq!(err.to_string(), "XML parse error: bad at offset 3");
    }
}
