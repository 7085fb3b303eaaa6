//! Rule matching and the masking walk over the document tree.

mod rules;
mod strategy;

pub use rules::RuleIndex;
pub use strategy::{MaskStrategy, FILLER};

use crate::dom::{Document, NodeId, XmlNode};

/// Rewrites text and CDATA content in place, walking the tree in document
/// order.
///
/// An element matching a rule masks the text of its whole subtree. A deeper
/// match replaces the inherited strategy for that subtree. Comments are never
/// touched.
pub fn apply_masks(doc: &mut Document, index: &RuleIndex) {
    if index.is_empty() {
        return;
    }
    mask_subtree(doc, doc.root(), None, index);
}

fn mask_subtree(
    doc: &mut Document,
    id: NodeId,
    inherited: Option<MaskStrategy>,
    index: &RuleIndex,
) {
    let (children, effective) = match doc.node(id) {
        Some(XmlNode::Element(el)) => {
            let own = index.lookup(&el.name, el.namespace.as_deref());
            (el.children.clone(), own.or(inherited))
        }
        _ => return,
    };
    for child in children {
        match doc.node_mut(child) {
            Some(XmlNode::Text(content)) | Some(XmlNode::CData(content)) => {
                if let Some(strategy) = effective {
                    *content = strategy.apply(content);
                }
            }
            Some(XmlNode::Element(_)) => mask_subtree(doc, child, effective, index),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MaskRule;

    fn rule(name: &str, space: &str, mask: MaskStrategy) -> MaskRule {
        MaskRule {
            name: name.to_string(),
            space: space.to_string(),
            mask,
        }
    }

    fn masked(input: &str, masks: &[MaskRule]) -> Document {
        let mut doc = Document::parse(input).unwrap();
        apply_masks(&mut doc, &RuleIndex::build(masks));
        doc
    }

    fn text_under(doc: &Document, id: NodeId) -> Vec<String> {
        let mut out = Vec::new();
        collect_text(doc, id, &mut out);
        out
    }

    fn collect_text(doc: &Document, id: NodeId, out: &mut Vec<String>) {
        if let Some(XmlNode::Element(el)) = doc.node(id) {
            for &child in &el.children {
                match doc.node(child) {
                    Some(XmlNode::Text(t)) | Some(XmlNode::CData(t)) => out.push(t.clone()),
                    Some(XmlNode::Element(_)) => collect_text(doc, child, out),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn masks_matched_element_text() {
        let doc = masked(
            "<a><b>1234567890</b><c>1234567890</c></a>",
            &[rule("b", "", MaskStrategy::ShowLastFour)],
        );
        assert_eq!(text_under(&doc, doc.root()), ["******7890", "1234567890"]);
    }

    #[test]
    fn match_covers_descendants() {
        let doc = masked(
            "<a><card><number>12345</number></card></a>",
            &[rule("card", "", MaskStrategy::ShowNone)],
        );
        assert_eq!(text_under(&doc, doc.root()), ["*****"]);
    }

    #[test]
    fn deeper_match_overrides_inherited_strategy() {
        let doc = masked(
            "<card><number>1234567890123456</number><note>hello world</note></card>",
            &[
                rule("card", "", MaskStrategy::ShowNone),
                rule("number", "", MaskStrategy::ShowLastFour),
            ],
        );
        assert_eq!(
            text_under(&doc, doc.root()),
            ["************3456", "***********"]
        );
    }

    #[test]
    fn cdata_is_masked_comments_are_not() {
        let input = "<a><s><![CDATA[secret]]><!--remark--></s></a>";
        let doc = masked(input, &[rule("s", "", MaskStrategy::ShowNone)]);
        assert_eq!(text_under(&doc, doc.root()), ["******"]);
        let root = match doc.node(doc.root()) {
            Some(XmlNode::Element(el)) => el,
            _ => unreachable!(),
        };
        let s = match doc.node(root.children[0]) {
            Some(XmlNode::Element(el)) => el,
            _ => unreachable!(),
        };
        assert!(matches!(
            doc.node(s.children[1]),
            Some(XmlNode::Comment(c)) if c == "remark"
        ));
    }

    #[test]
    fn namespace_scoped_rule_skips_other_namespaces() {
        let doc = masked(
            r#"<r xmlns:ct="urn:ct"><ct:Id>12345</ct:Id><Id>12345</Id></r>"#,
            &[rule("Id", "urn:ct", MaskStrategy::ShowNone)],
        );
        assert_eq!(text_under(&doc, doc.root()), ["*****", "12345"]);
    }

    #[test]
    fn empty_rule_set_changes_nothing() {
        let doc = masked("<a><b>1234567890</b></a>", &[]);
        assert_eq!(text_under(&doc, doc.root()), ["1234567890"]);
    }
}
