//! Arena-based document tree.
//!
//! - Nodes live in one `Vec` and reference each other by `NodeId` (u32)
//! - Elements keep their attributes in source order, xmlns included
//! - Namespace resolution happens once, at build time

pub mod document;
pub mod namespace;
pub mod node;

pub use document::Document;
pub use namespace::NamespaceResolver;
pub use node::{Attribute, Element, NodeId, XmlDeclaration, XmlNode};
