//! Entity decoding and output escaping.
//!
//! Only the five predefined entities and numeric character references are
//! recognized. DTD-defined entities are rejected, matching the parser's
//! refusal of DOCTYPE declarations. Decoding borrows the input when it
//! contains no `&` at all.

use std::borrow::Cow;

use memchr::memchr;

use crate::error::ParseError;

/// Decodes entity references in text or attribute content.
///
/// `base` is the byte offset of `input` within the document, used for error
/// positions.
pub fn decode_text(input: &str, base: usize) -> Result<Cow<'_, str>, ParseError> {
    let bytes = input.as_bytes();
    if memchr(b'&', bytes).is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    while pos < bytes.len() {
        match memchr(b'&', &bytes[pos..]) {
            None => {
                out.push_str(&input[pos..]);
                break;
            }
            Some(offset) => {
                out.push_str(&input[pos..pos + offset]);
                let amp = pos + offset;
                let entity = read_entity(input, amp)
                    .ok_or_else(|| ParseError::at("bare '&' must be escaped as &amp;", base + amp))?;
                let decoded = decode_entity(entity).ok_or_else(|| {
                    ParseError::at(format!("undefined entity '&{entity};'"), base + amp)
                })?;
                out.push(decoded);
                pos = amp + entity.len() + 2;
            }
        }
    }
    Ok(Cow::Owned(out))
}

/// The entity name between `&` at `amp` and the next `;`, or `None` when the
/// reference is not even shaped like one.
fn read_entity(input: &str, amp: usize) -> Option<&str> {
    let rest = &input.as_bytes()[amp + 1..];
    let semi = memchr(b';', rest)?;
    let entity = &input[amp + 1..amp + 1 + semi];
    if entity.is_empty()
        || entity
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b == b'&' || b == b'<')
    {
        return None;
    }
    Some(entity)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            let c = char::from_u32(code)?;
            is_xml_char(c).then_some(c)
        }
    }
}

/// Characters allowed by the XML 1.0 Char production.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{09}' | '\u{0a}' | '\u{0d}'
        | '\u{20}'..='\u{d7ff}'
        | '\u{e000}'..='\u{fffd}'
        | '\u{10000}'..='\u{10ffff}')
}

/// Escapes element text for output. `&` and `<` always need escaping there;
/// `>` only when it would complete a literal `]]>`, which XML forbids in
/// character data.
pub fn escape_text(input: &str, out: &mut String) {
    let mut brackets = 0usize;
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if brackets >= 2 => out.push_str("&gt;"),
            _ => out.push(c),
        }
        brackets = if c == ']' { brackets + 1 } else { 0 };
    }
}

/// Escapes a double-quoted attribute value for output.
pub fn escape_attr(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_stays_borrowed() {
        let decoded = decode_text("no entities here", 0).unwrap();
        assert!(matches!(decoded, Cow::Borrowed(_)));
    }

    #[test]
    fn decodes_named_entities() {
        assert_eq!(decode_text("a &amp; b &lt;c&gt;", 0).unwrap(), "a & b <c>");
        assert_eq!(decode_text("&quot;&apos;", 0).unwrap(), "\"'");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_text("&#65;&#x42;&#x1F600;", 0).unwrap(), "AB\u{1F600}");
    }

    #[test]
    fn rejects_bare_ampersand() {
        let err = decode_text("salt & pepper", 10).unwrap_err();
        assert_eq!(err.position, Some(15));
        assert!(err.message.contains("&amp;"), "{}", err.message);
    }

    #[test]
    fn rejects_undefined_entity() {
        let err = decode_text("&nbsp;", 0).unwrap_err();
        assert!(err.message.contains("nbsp"), "{}", err.message);
    }

    #[test]
    fn rejects_invalid_char_reference() {
        assert!(decode_text("&#0;", 0).is_err());
        assert!(decode_text("&#xD800;", 0).is_err());
    }

    #[test]
    fn escape_text_is_minimal() {
        let mut out = String::new();
        escape_text("a < b & c > d", &mut out);
        assert_eq!(out, "a &lt; b &amp; c > d");
    }

    #[test]
    fn escape_text_breaks_cdata_end_sequence() {
        let cases = [
            ("]]>", "]]&gt;"),
            ("x]]>y", "x]]&gt;y"),
            ("]]]>", "]]]&gt;"),
            ("] ]>", "] ]>"),
            ("]>", "]>"),
        ];
        for (input, want) in cases {
            let mut out = String::new();
            escape_text(input, &mut out);
            assert_eq!(out, want, "input {input:?}");
        }
    }

    #[test]
    fn escape_attr_covers_quotes() {
        let mut out = String::new();
        escape_attr(r#"say "hi" & <go>"#, &mut out);
        assert_eq!(out, "say &quot;hi&quot; &amp; &lt;go>");
    }
}
