//! Rule lookup.
//!
//! Rules are grouped by lowercased local name so a document walk costs one
//! hash lookup per element instead of a scan over every configured rule.
//! Rules sharing a name keep their configuration order, which is what makes
//! "first match wins" hold.

use std::collections::HashMap;

use crate::mask::MaskStrategy;
use crate::options::MaskRule;

#[derive(Debug)]
pub struct RuleIndex {
    by_name: HashMap<String, Vec<NamespaceRule>>,
}

#[derive(Debug)]
struct NamespaceRule {
    /// Required namespace URI. `None` matches any namespace, including none.
    space: Option<String>,
    strategy: MaskStrategy,
}

impl RuleIndex {
    pub fn build(masks: &[MaskRule]) -> Self {
        let mut by_name: HashMap<String, Vec<NamespaceRule>> = HashMap::new();
        for rule in masks {
            let space = if rule.space.is_empty() {
                None
            } else {
                Some(rule.space.clone())
            };
            by_name
                .entry(rule.name.to_ascii_lowercase())
                .or_default()
                .push(NamespaceRule {
                    space,
                    strategy: rule.mask,
                });
        }
        RuleIndex { by_name }
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// First rule matching the element's local name and resolved namespace.
    pub fn lookup(&self, local_name: &str, namespace: Option<&str>) -> Option<MaskStrategy> {
        let candidates = self.by_name.get(&local_name.to_ascii_lowercase())?;
        candidates
            .iter()
            .find(|rule| match &rule.space {
                None => true,
                Some(space) => namespace == Some(space.as_str()),
            })
            .map(|rule| rule.strategy)
    }
}
