//! Masking options and their JSON wire form.
//!
//! Hosts hand over one options object per call:
//!
//! ```json
//! {
//!   "prefix": "",
//!   "indent": 2,
//!   "masks": [
//!     { "name": "AccountNumber", "space": "urn:iso:std:iso:20022", "mask": "show-last-four" }
//!   ]
//! }
//! ```

use serde::Deserialize;

use crate::mask::MaskStrategy;

/// Everything that controls a single masking run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Emitted at the start of every output line when indenting.
    pub prefix: String,
    /// Indentation per nesting level. Empty means compact output.
    pub indent: Indent,
    /// Masking rules, consulted in order. First match wins.
    pub masks: Vec<MaskRule>,
}

impl Options {
    /// Checks the options before any parsing happens.
    pub fn validate(&self) -> Result<(), String> {
        for (i, rule) in self.masks.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(format!("mask rule #{} has an empty element name", i + 1));
            }
        }
        if let Indent::Literal(lit) = &self.indent {
            if !lit.chars().all(char::is_whitespace) {
                return Err("indent must contain only whitespace".to_string());
            }
        }
        Ok(())
    }
}

/// Indentation, given either as a space count or a whitespace literal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Indent {
    Count(usize),
    Literal(String),
}

impl Indent {
    /// The whitespace string written per nesting level.
    pub fn to_literal(&self) -> String {
        match self {
            Indent::Count(n) => " ".repeat(*n),
            Indent::Literal(lit) => lit.clone(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Literal("  ".to_string())
    }
}

/// One element-matching rule.
#[derive(Debug, Clone, Deserialize)]
pub struct MaskRule {
    /// Element local name, compared ASCII case-insensitively.
    pub name: String,
    /// Namespace URI the element must resolve to. Empty matches any.
    #[serde(default)]
    pub space: String,
    /// Strategy applied to matched text.
    pub mask: MaskStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_schema() {
        let json = r#"{
            "prefix": "",
            "indent": 4,
            "masks": [
                { "name": "ssn", "mask": "show-none" },
                { "name": "Nm", "space": "urn:example", "mask": "show-word-start" }
            ]
        }"#;
        let options: Options = serde_json::from_str(json).unwrap();
        assert_eq!(options.indent, Indent::Count(4));
        assert_eq!(options.masks.len(), 2);
        assert_eq!(options.masks[0].space, "");
        assert_eq!(options.masks[0].mask, MaskStrategy::ShowNone);
        assert_eq!(options.masks[1].space, "urn:example");
    }

    #[test]
    fn indent_accepts_literal_string() {
        let options: Options = serde_json::from_str(r#"{"indent": "\t"}"#).unwrap();
        assert_eq!(options.indent.to_literal(), "\t");
    }

    #[test]
    fn rejects_unknown_strategy() {
        let json = r#"{"masks": [{ "name": "a", "mask": "redact-all" }]}"#;
        assert!(serde_json::from_str::<Options>(json).is_err());
    }

    #[test]
    fn validate_rejects_empty_rule_name() {
        let options = Options {
            masks: vec![MaskRule {
                name: "  ".to_string(),
                space: String::new(),
                mask: MaskStrategy::ShowNone,
            }],
            ..Options::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.contains("mask rule #1"), "{err}");
    }

    #[test]
    fn validate_rejects_non_whitespace_indent() {
        let options = Options {
            indent: Indent::Literal("--".to_string()),
            ..Options::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn default_indent_is_two_spaces() {
        assert_eq!(Options::default().indent.to_literal(), "  ");
    }
}
