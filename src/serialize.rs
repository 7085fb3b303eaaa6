//! Writes a document tree back out as XML text.
//!
//! Output layout follows the options: with a non-empty indent, every element
//! whose content is pure markup (child elements and comments only) gets its
//! children on their own lines, each starting with the configured prefix and
//! one indent copy per nesting level. Elements containing character data are
//! written inline, whole subtree included, so text never gains or loses
//! whitespace. An empty indent yields compact single-line output and the
//! prefix is not used.
//!
//! Before anything is written for an element, its prefix and attribute
//! prefixes are checked against the in-scope xmlns declarations. The parser
//! only builds trees where those resolve, so a failure here points at a bug,
//! not at bad input.

use crate::core::entities::{escape_attr, escape_text};
use crate::dom::{Document, Element, NamespaceResolver, NodeId, XmlDeclaration, XmlNode};
use crate::error::SerializeError;
use crate::options::Options;

pub fn serialize(doc: &Document, options: &Options) -> Result<String, SerializeError> {
    let mut writer = Writer {
        doc,
        out: String::new(),
        indent: options.indent.to_literal(),
        prefix: options.prefix.clone(),
        resolver: NamespaceResolver::new(),
    };

    if let Some(decl) = doc.decl() {
        writer.open_line(0);
        writer.write_decl(decl);
    }
    for comment in doc.prolog_comments() {
        writer.open_line(0);
        writer.write_comment(comment);
    }
    writer.open_line(0);
    writer.write_element(doc.root(), 0, false)?;
    for comment in doc.epilog_comments() {
        writer.open_line(0);
        writer.write_comment(comment);
    }
    Ok(writer.out)
}

struct Writer<'a> {
    doc: &'a Document,
    out: String,
    indent: String,
    prefix: String,
    resolver: NamespaceResolver,
}

impl Writer<'_> {
    /// Starts a fresh output line at the given depth. No-op in compact mode,
    /// and at the very start of the output only the prefix is written.
    fn open_line(&mut self, depth: usize) {
        if self.indent.is_empty() {
            return;
        }
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(&self.prefix);
        for _ in 0..depth {
            self.out.push_str(&self.indent);
        }
    }

    fn write_decl(&mut self, decl: &XmlDeclaration) {
        self.out.push_str("<?xml version=\"");
        self.out.push_str(&decl.version);
        self.out.push('"');
        if let Some(encoding) = &decl.encoding {
            self.out.push_str(" encoding=\"");
            self.out.push_str(encoding);
            self.out.push('"');
        }
        if let Some(standalone) = decl.standalone {
            self.out.push_str(" standalone=\"");
            self.out.push_str(if standalone { "yes" } else { "no" });
            self.out.push('"');
        }
        self.out.push_str("?>");
    }

    fn write_comment(&mut self, content: &str) {
        self.out.push_str("<!--");
        self.out.push_str(content);
        self.out.push_str("-->");
    }

    fn write_element(
        &mut self,
        id: NodeId,
        depth: usize,
        inline: bool,
    ) -> Result<(), SerializeError> {
        let el = match self.doc.node(id) {
            Some(XmlNode::Element(el)) => el,
            Some(_) => return Err(SerializeError(format!("node {id} is not an element"))),
            None => return Err(SerializeError(format!("dangling node id {id}"))),
        };

        self.resolver.push_scope();
        for attr in &el.attributes {
            if attr.prefix.is_none() && attr.local_name == "xmlns" {
                self.resolver.declare_default(&attr.value);
            } else if attr.prefix.as_deref() == Some("xmlns") {
                self.resolver.declare(&attr.local_name, &attr.value);
            }
        }
        self.check_prefixes(el)?;

        self.out.push('<');
        push_qname(&mut self.out, el);
        for attr in &el.attributes {
            self.out.push(' ');
            self.out.push_str(&attr.name);
            self.out.push_str("=\"");
            escape_attr(&attr.value, &mut self.out);
            self.out.push('"');
        }

        if el.children.is_empty() {
            self.out.push_str("/>");
            self.resolver.pop_scope();
            return Ok(());
        }
        self.out.push('>');

        let inline = inline
            || self.indent.is_empty()
            || el.children.iter().any(|&c| {
                matches!(
                    self.doc.node(c),
                    Some(XmlNode::Text(_)) | Some(XmlNode::CData(_))
                )
            });
        for &child in &el.children {
            if !inline {
                self.open_line(depth + 1);
            }
            self.write_child(child, depth + 1, inline)?;
        }
        if !inline {
            self.open_line(depth);
        }

        self.out.push_str("</");
        push_qname(&mut self.out, el);
        self.out.push('>');
        self.resolver.pop_scope();
        Ok(())
    }

    fn write_child(
        &mut self,
        id: NodeId,
        depth: usize,
        inline: bool,
    ) -> Result<(), SerializeError> {
        match self.doc.node(id) {
            None => Err(SerializeError(format!("dangling node id {id}"))),
            Some(XmlNode::Element(_)) => self.write_element(id, depth, inline),
            Some(XmlNode::Text(text)) => {
                escape_text(text, &mut self.out);
                Ok(())
            }
            Some(XmlNode::CData(content)) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(content);
                self.out.push_str("]]>");
                Ok(())
            }
            Some(XmlNode::Comment(content)) => {
                self.write_comment(content);
                Ok(())
            }
        }
    }

    fn check_prefixes(&self, el: &Element) -> Result<(), SerializeError> {
        if let Some(prefix) = &el.prefix {
            if self.resolver.resolve(prefix).is_none() {
                return Err(SerializeError(format!(
                    "namespace prefix '{prefix}' is not declared at <{}>",
                    el.name
                )));
            }
        }
        for attr in &el.attributes {
            match attr.prefix.as_deref() {
                None | Some("xmlns") => {}
                Some(prefix) => {
                    if self.resolver.resolve(prefix).is_none() {
                        return Err(SerializeError(format!(
                            "namespace prefix '{prefix}' is not declared at attribute '{}'",
                            attr.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn push_qname(out: &mut String, el: &Element) {
    if let Some(prefix) = &el.prefix {
        out.push_str(prefix);
        out.push(':');
    }
    out.push_str(&el.name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Indent;

    fn write(input: &str, indent: Indent, prefix: &str) -> String {
        let doc = Document::parse(input).unwrap();
        let options = Options {
            prefix: prefix.to_string(),
            indent,
            masks: Vec::new(),
        };
        serialize(&doc, &options).unwrap()
    }

    #[test]
    fn indents_nested_elements() {
        let out = write("<a><b>x</b><c/></a>", Indent::Count(2), "");
        assert_eq!(out, "<a>\n  <b>x</b>\n  <c/>\n</a>");
    }

    #[test]
    fn compact_output_has_no_breaks() {
        let out = write("<a>\n  <b>x</b>\n</a>", Indent::Count(0), "");
        assert_eq!(out, "<a><b>x</b></a>");
    }

    #[test]
    fn mixed_content_stays_inline() {
        let out = write("<p>hello <b>world</b>!</p>", Indent::Count(2), "");
        assert_eq!(out, "<p>hello <b>world</b>!</p>");
    }

    #[test]
    fn prefix_starts_every_line() {
        let out = write("<a><b>x</b></a>", Indent::Count(2), "> ");
        assert_eq!(out, "> <a>\n>   <b>x</b>\n> </a>");
    }

    #[test]
    fn tab_literal_indent() {
        let out = write("<a><b>x</b></a>", Indent::Literal("\t".to_string()), "");
        assert_eq!(out, "<a>\n\t<b>x</b>\n</a>");
    }

    #[test]
    fn declaration_is_reconstructed() {
        let out = write(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>",
            Indent::Count(2),
            "",
        );
        assert_eq!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a/>");
    }

    #[test]
    fn attributes_keep_source_order() {
        let out = write(
            r#"<a z="1" xmlns:ct="urn:ct" b="2"><ct:c/></a>"#,
            Indent::Count(0),
            "",
        );
        assert_eq!(out, r#"<a z="1" xmlns:ct="urn:ct" b="2"><ct:c/></a>"#);
    }

    #[test]
    fn escapes_text_and_attributes() {
        let out = write(r#"<a t="&quot;&lt;">x &amp; y</a>"#, Indent::Count(0), "");
        assert_eq!(out, r#"<a t="&quot;&lt;">x &amp; y</a>"#);
    }

    #[test]
    fn cdata_and_comments_round_trip() {
        let out = write("<a><![CDATA[1 < 2]]><!--note--></a>", Indent::Count(0), "");
        assert_eq!(out, "<a><![CDATA[1 < 2]]><!--note--></a>");
    }

    #[test]
    fn comment_children_get_their_own_lines() {
        let out = write("<a><!--note--><b/></a>", Indent::Count(2), "");
        assert_eq!(out, "<a>\n  <!--note-->\n  <b/>\n</a>");
    }

    #[test]
    fn doc_level_comments_round_trip() {
        let out = write("<!--before--><a/><!--after-->", Indent::Count(2), "");
        assert_eq!(out, "<!--before-->\n<a/>\n<!--after-->");
    }

    #[test]
    fn whitespace_only_element_collapses() {
        let out = write("<a>   </a>", Indent::Count(2), "");
        assert_eq!(out, "<a/>");
    }
}
