//! xmlmask - mask sensitive element text inside XML documents.
//!
//! The pipeline is parse, match, mask, serialize:
//!
//! 1. the input is parsed into an arena-based tree ([`dom::Document`])
//! 2. elements are matched against the configured [`MaskRule`]s by local
//!    name and resolved namespace
//! 3. text and CDATA content under matched elements is rewritten by the
//!    rule's [`MaskStrategy`]
//! 4. the tree is written back out with the configured indentation
//!
//! ```
//! use xmlmask::{mask_xml, MaskRule, MaskStrategy, Options};
//!
//! let options = Options {
//!     masks: vec![MaskRule {
//!         name: "AcctNb".to_string(),
//!         space: String::new(),
//!         mask: MaskStrategy::ShowLastFour,
//!     }],
//!     ..Options::default()
//! };
//! let out = mask_xml("<Doc><AcctNb>1234567890</AcctNb></Doc>", &options).unwrap();
//! assert_eq!(out, "<Doc>\n  <AcctNb>******7890</AcctNb>\n</Doc>");
//! ```

mod core;
pub mod dom;
mod error;
mod mask;
mod options;
mod reader;
mod serialize;

pub use error::{MaskError, ParseError, SerializeError};
pub use mask::{MaskStrategy, FILLER};
pub use options::{Indent, MaskRule, Options};

use mask::RuleIndex;

/// Masks one XML document according to `options`.
///
/// The input is fully parsed before any masking happens, so an error never
/// leaves partially masked output behind.
pub fn mask_xml(xml: &str, options: &Options) -> Result<String, MaskError> {
    options.validate().map_err(MaskError::Validation)?;

    let mut doc = dom::Document::parse(xml)?;
    tracing::debug!(
        nodes = doc.node_count(),
        rules = options.masks.len(),
        "parsed document"
    );

    let index = RuleIndex::build(&options.masks);
    mask::apply_masks(&mut doc, &index);

    let out = serialize::serialize(&doc, options)?;
    Ok(out)
}
