//! Core XML parsing primitives.
//!
//! - Scanner: memchr-backed delimiter detection
//! - Tokenizer: raw markup tokens with byte positions
//! - Entities: entity decoding and output escaping
//! - Attributes: strict attribute parsing

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;

use crate::error::ParseError;

/// Splits a qualified name into optional prefix and local part.
///
/// Rejects names with a leading, trailing, or second colon. `pos` is the byte
/// offset of the name within the document.
pub(crate) fn split_qname(name: &str, pos: usize) -> Result<(Option<&str>, &str), ParseError> {
    match name.find(':') {
        None => Ok((None, name)),
        Some(colon) => {
            let prefix = &name[..colon];
            let local = &name[colon + 1..];
            if prefix.is_empty() || local.is_empty() || local.contains(':') {
                return Err(ParseError::at(
                    format!("invalid qualified name '{name}'"),
                    pos,
                ));
            }
            Ok((Some(prefix), local))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_prefixed_and_plain_names() {
        assert_eq!(split_qname("a", 0).unwrap(), (None, "a"));
        assert_eq!(split_qname("ct:Id", 0).unwrap(), (Some("ct"), "Id"));
    }

    #[test]
    fn rejects_malformed_qnames() {
        assert!(split_qname(":a", 0).is_err());
        assert!(split_qname("a:", 0).is_err());
        assert!(split_qname("a:b:c", 0).is_err());
    }
}
