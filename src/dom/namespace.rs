//! Stack-based namespace resolution.

/// Well-known namespace URIs.
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Namespace binding (prefix -> URI). `prefix` of `None` is the default
/// namespace.
#[derive(Debug, Clone)]
struct NsBinding {
    prefix: Option<String>,
    uri: String,
    depth: u16,
}

/// Tracks in-scope namespace declarations while walking a tree, one scope per
/// element. The `xml` prefix is pre-bound and cannot be shadowed.
#[derive(Debug)]
pub struct NamespaceResolver {
    bindings: Vec<NsBinding>,
    depth: u16,
}

impl NamespaceResolver {
    pub fn new() -> Self {
        let mut resolver = NamespaceResolver {
            bindings: Vec::with_capacity(16),
            depth: 0,
        };
        resolver.bindings.push(NsBinding {
            prefix: Some("xml".to_string()),
            uri: ns::XML.to_string(),
            depth: 0,
        });
        resolver
    }

    /// Enter an element scope.
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, dropping any bindings declared in it.
    pub fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a prefix binding in the current scope.
    pub fn declare(&mut self, prefix: &str, uri: &str) {
        if prefix == "xml" || prefix == "xmlns" {
            return;
        }
        self.bindings.push(NsBinding {
            prefix: Some(prefix.to_string()),
            uri: uri.to_string(),
            depth: self.depth,
        });
    }

    /// Declare the default namespace in the current scope. An empty URI
    /// un-declares it, per xmlns="".
    pub fn declare_default(&mut self, uri: &str) {
        self.bindings.push(NsBinding {
            prefix: None,
            uri: uri.to_string(),
            depth: self.depth,
        });
    }

    /// Resolve a prefix to its innermost bound URI. A binding to the empty
    /// string counts as unbound.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix.as_deref() == Some(prefix))
            .map(|b| b.uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    /// The in-scope default namespace, if one is declared and non-empty.
    pub fn default_namespace(&self) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix.is_none())
            .map(|b| b.uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new()
    }
}
