//! Pull-style event reading on top of the tokenizer.
//!
//! - Events: borrowed event types for pull parsing
//! - SliceReader: zero-copy reader over an in-memory document

pub mod events;
pub mod slice;

pub use events::{EndElement, StartElement, XmlEvent};
pub use slice::SliceReader;
