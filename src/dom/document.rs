//! Arena-based document tree and its builder.
//!
//! The builder consumes reader events and enforces the structural rules the
//! tokenizer cannot see: exactly one root element, balanced and matching
//! tags, no character data outside the root, and every prefix declared in
//! scope. Whitespace that only exists to lay out markup (text between child
//! elements with no real character data next to it) is dropped, since output
//! formatting is governed solely by the serializer's indent settings.

use crate::dom::namespace::NamespaceResolver;
use crate::dom::node::{Attribute, Element, NodeId, XmlDeclaration, XmlNode};
use crate::error::ParseError;
use crate::reader::events::{StartElement, XmlEvent};
use crate::reader::slice::SliceReader;

#[derive(Debug)]
pub struct Document {
    nodes: Vec<XmlNode>,
    root: NodeId,
    decl: Option<XmlDeclaration>,
    /// Comments before the root element, in order.
    prolog: Vec<String>,
    /// Comments after the root element, in order.
    epilog: Vec<String>,
}

impl Document {
    /// Parses a complete document.
    pub fn parse(input: &str) -> Result<Document, ParseError> {
        let mut reader = SliceReader::new(input);
        let mut nodes: Vec<XmlNode> = Vec::with_capacity(64);
        let mut stack: Vec<(NodeId, String)> = Vec::new();
        let mut resolver = NamespaceResolver::new();
        let mut decl = None;
        let mut root: Option<NodeId> = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();

        while let Some(event) = reader.next_event()? {
            match event {
                XmlEvent::XmlDeclaration {
                    version,
                    encoding,
                    standalone,
                } => {
                    // the tokenizer pins the declaration to offset 0, so it
                    // is always the first event
                    decl = Some(XmlDeclaration {
                        version,
                        encoding,
                        standalone,
                    });
                }
                XmlEvent::StartElement(start) => {
                    let id = open_element(&mut nodes, &mut resolver, &start)?;
                    attach(&mut nodes, &stack, &mut root, id, &start)?;
                    stack.push((id, start.name.to_string()));
                }
                XmlEvent::EmptyElement(start) => {
                    let id = open_element(&mut nodes, &mut resolver, &start)?;
                    attach(&mut nodes, &stack, &mut root, id, &start)?;
                    resolver.pop_scope();
                }
                XmlEvent::EndElement(end) => match stack.pop() {
                    Some((id, open_name)) if open_name == end.name => {
                        resolver.pop_scope();
                        strip_layout_whitespace(&mut nodes, id);
                    }
                    Some((_, open_name)) => {
                        return Err(ParseError::at(
                            format!(
                                "mismatched closing tag: expected </{open_name}>, found </{}>",
                                end.name
                            ),
                            end.position,
                        ));
                    }
                    None => {
                        return Err(ParseError::at(
                            format!("unexpected closing tag </{}>", end.name),
                            end.position,
                        ));
                    }
                },
                XmlEvent::Text { content, position } => match stack.last() {
                    Some(&(parent, _)) => {
                        let id = push_node(&mut nodes, XmlNode::Text(content.into_owned()));
                        add_child(&mut nodes, parent, id);
                    }
                    None => {
                        if !content.chars().all(char::is_whitespace) {
                            return Err(ParseError::at(
                                "text content is not allowed outside the root element",
                                position,
                            ));
                        }
                    }
                },
                XmlEvent::CData { content, position } => match stack.last() {
                    Some(&(parent, _)) => {
                        let id = push_node(&mut nodes, XmlNode::CData(content.to_string()));
                        add_child(&mut nodes, parent, id);
                    }
                    None => {
                        return Err(ParseError::at(
                            "CDATA section is not allowed outside the root element",
                            position,
                        ));
                    }
                },
                XmlEvent::Comment(content) => match stack.last() {
                    Some(&(parent, _)) => {
                        let id = push_node(&mut nodes, XmlNode::Comment(content.to_string()));
                        add_child(&mut nodes, parent, id);
                    }
                    None if root.is_none() => prolog.push(content.to_string()),
                    None => epilog.push(content.to_string()),
                },
            }
        }

        if let Some((_, open_name)) = stack.first() {
            return Err(ParseError::new(format!("unclosed tag <{open_name}>")));
        }
        let root = root.ok_or_else(|| ParseError::new("document has no root element"))?;
        Ok(Document {
            nodes,
            root,
            decl,
            prolog,
            epilog,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut XmlNode> {
        self.nodes.get_mut(id as usize)
    }

    pub fn decl(&self) -> Option<&XmlDeclaration> {
        self.decl.as_ref()
    }

    pub fn prolog_comments(&self) -> &[String] {
        &self.prolog
    }

    pub fn epilog_comments(&self) -> &[String] {
        &self.epilog
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn push_node(nodes: &mut Vec<XmlNode>, node: XmlNode) -> NodeId {
    let id = nodes.len() as NodeId;
    nodes.push(node);
    id
}

fn add_child(nodes: &mut [XmlNode], parent: NodeId, child: NodeId) {
    if let XmlNode::Element(el) = &mut nodes[parent as usize] {
        el.children.push(child);
    }
}

/// Creates the element node with namespaces resolved, leaving its scope on
/// the resolver stack. The caller pops it when the element closes.
fn open_element(
    nodes: &mut Vec<XmlNode>,
    resolver: &mut NamespaceResolver,
    start: &StartElement<'_>,
) -> Result<NodeId, ParseError> {
    resolver.push_scope();
    for attr in &start.attributes {
        if attr.prefix.is_none() && attr.local_name == "xmlns" {
            resolver.declare_default(attr.value.as_ref());
        } else if attr.prefix == Some("xmlns") {
            resolver.declare(attr.local_name, attr.value.as_ref());
        }
    }

    let namespace = match start.prefix {
        Some(prefix) => Some(
            resolver
                .resolve(prefix)
                .ok_or_else(|| {
                    ParseError::at(
                        format!("undeclared namespace prefix '{prefix}'"),
                        start.position,
                    )
                })?
                .to_string(),
        ),
        None => resolver.default_namespace().map(str::to_string),
    };

    let mut attributes = Vec::with_capacity(start.attributes.len());
    for attr in &start.attributes {
        // the default namespace does not apply to attributes
        let attr_ns = match attr.prefix {
            None | Some("xmlns") => None,
            Some(prefix) => Some(
                resolver
                    .resolve(prefix)
                    .ok_or_else(|| {
                        ParseError::at(
                            format!("undeclared namespace prefix '{prefix}'"),
                            start.position,
                        )
                    })?
                    .to_string(),
            ),
        };
        attributes.push(Attribute {
            name: attr.name.to_string(),
            local_name: attr.local_name.to_string(),
            prefix: attr.prefix.map(str::to_string),
            namespace: attr_ns,
            value: attr.value.as_ref().to_string(),
        });
    }

    Ok(push_node(
        nodes,
        XmlNode::Element(Element {
            name: start.local_name.to_string(),
            prefix: start.prefix.map(str::to_string),
            namespace,
            attributes,
            children: Vec::new(),
        }),
    ))
}

fn attach(
    nodes: &mut [XmlNode],
    stack: &[(NodeId, String)],
    root: &mut Option<NodeId>,
    id: NodeId,
    start: &StartElement<'_>,
) -> Result<(), ParseError> {
    match stack.last() {
        Some(&(parent, _)) => add_child(nodes, parent, id),
        None => {
            if root.is_some() {
                return Err(ParseError::at(
                    "document has multiple root elements",
                    start.position,
                ));
            }
            *root = Some(id);
        }
    }
    Ok(())
}

/// Drops whitespace-only text children of an element that has no real
/// character data. Runs when the element closes. Mixed content (any
/// non-whitespace text or CDATA child) is left untouched.
fn strip_layout_whitespace(nodes: &mut [XmlNode], id: NodeId) {
    let children = match &nodes[id as usize] {
        XmlNode::Element(el) => el.children.clone(),
        _ => return,
    };
    let has_real_text = children.iter().any(|&c| match &nodes[c as usize] {
        XmlNode::Text(t) => !t.chars().all(char::is_whitespace),
        XmlNode::CData(_) => true,
        _ => false,
    });
    if has_real_text {
        return;
    }
    let kept: Vec<NodeId> = children
        .iter()
        .copied()
        .filter(|&c| !matches!(&nodes[c as usize], XmlNode::Text(_)))
        .collect();
    if kept.len() != children.len() {
        if let XmlNode::Element(el) = &mut nodes[id as usize] {
            el.children = kept;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_element(doc: &Document) -> &Element {
        doc.node(doc.root()).and_then(XmlNode::as_element).unwrap()
    }

    #[test]
    fn builds_nested_tree() {
        let doc = Document::parse("<a><b>hi</b><c/></a>").unwrap();
        let a = root_element(&doc);
        assert_eq!(a.name, "a");
        assert_eq!(a.children.len(), 2);
        let b = doc.node(a.children[0]).and_then(XmlNode::as_element).unwrap();
        assert!(matches!(doc.node(b.children[0]), Some(XmlNode::Text(t)) if t == "hi"));
    }

    #[test]
    fn drops_layout_whitespace_keeps_mixed_content() {
        let doc = Document::parse("<a>\n  <b>x</b>\n</a>").unwrap();
        assert_eq!(root_element(&doc).children.len(), 1);

        let doc = Document::parse("<p>hello <b>world</b>!</p>").unwrap();
        assert_eq!(root_element(&doc).children.len(), 3);
    }

    #[test]
    fn resolves_prefixes_and_default_namespace() {
        let doc = Document::parse(
            r#"<a xmlns="urn:default" xmlns:ct="urn:ct"><ct:b attr="1" ct:other="2"/><c/></a>"#,
        )
        .unwrap();
        let a = root_element(&doc);
        assert_eq!(a.namespace.as_deref(), Some("urn:default"));
        let b = doc.node(a.children[0]).and_then(XmlNode::as_element).unwrap();
        assert_eq!(b.namespace.as_deref(), Some("urn:ct"));
        assert_eq!(b.attributes[0].namespace, None);
        assert_eq!(b.attributes[1].namespace.as_deref(), Some("urn:ct"));
        let c = doc.node(a.children[1]).and_then(XmlNode::as_element).unwrap();
        assert_eq!(c.namespace.as_deref(), Some("urn:default"));
    }

    #[test]
    fn namespace_declarations_stay_as_attributes() {
        let doc = Document::parse(r#"<a xmlns:ct="urn:ct"/>"#).unwrap();
        let a = root_element(&doc);
        assert_eq!(a.attributes.len(), 1);
        assert_eq!(a.attributes[0].name, "xmlns:ct");
        assert_eq!(a.attributes[0].value, "urn:ct");
    }

    #[test]
    fn keeps_declaration_and_doc_level_comments() {
        let doc =
            Document::parse("<?xml version=\"1.0\"?><!--before--><a/><!--after-->").unwrap();
        assert_eq!(doc.decl().unwrap().version, "1.0");
        assert_eq!(doc.prolog_comments(), ["before"]);
        assert_eq!(doc.epilog_comments(), ["after"]);
    }

    #[test]
    fn rejects_undeclared_prefix() {
        let err = Document::parse("<ct:a/>").unwrap_err();
        assert!(err.message.contains("undeclared namespace prefix"), "{}", err.message);
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = Document::parse("<a><b>text</a>").unwrap_err();
        assert!(err.message.contains("mismatched closing tag"), "{}", err.message);
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = Document::parse("<a><b></b>").unwrap_err();
        assert!(err.message.contains("unclosed tag <a>"), "{}", err.message);
    }

    #[test]
    fn rejects_multiple_roots() {
        let err = Document::parse("<a/><b/>").unwrap_err();
        assert!(err.message.contains("multiple root elements"), "{}", err.message);
    }

    #[test]
    fn rejects_stray_end_tag_and_doc_level_text() {
        assert!(Document::parse("</a>").is_err());
        assert!(Document::parse("junk<a/>").is_err());
        assert!(Document::parse("<a/>trailing").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        let err = Document::parse("").unwrap_err();
        assert!(err.message.contains("no root element"), "{}", err.message);
    }

    #[test]
    fn whitespace_between_prolog_and_root_is_fine() {
        assert!(Document::parse("<?xml version=\"1.0\"?>\n<a/>\n").is_ok());
    }
}
