//! Node representation.
//!
//! Nodes live in one arena owned by the document and reference each other by
//! NodeId (u32), keeping the tree compact and cheap to walk.

/// Index into the document's node arena.
pub type NodeId = u32;

/// One node of the document tree.
#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(Element),
    /// Character data, entity references already decoded.
    Text(String),
    /// CDATA content, kept verbatim and re-emitted as a CDATA section.
    CData(String),
    /// Comment content without the `<!--` `-->` delimiters.
    Comment(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    /// Local name, no prefix.
    pub name: String,
    pub prefix: Option<String>,
    /// Namespace URI the element resolved to, if any.
    pub namespace: Option<String>,
    /// Attributes in source order, xmlns declarations included.
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order.
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    /// Name as written, prefix included.
    pub name: String,
    pub local_name: String,
    pub prefix: Option<String>,
    /// Resolved namespace URI. `None` for unprefixed attributes and for
    /// xmlns declarations themselves.
    pub namespace: Option<String>,
    pub value: String,
}

/// Fields of the `<?xml ...?>` declaration, re-emitted on output.
#[derive(Debug, Clone)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<bool>,
}
