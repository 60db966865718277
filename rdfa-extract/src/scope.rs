use std::rc::Rc;

use curie::{Curie, PrefixMapping};
use oxiri::IriRef;
use tracing::trace;

use crate::resolve::ResolveError;
use crate::tree::Element;

/// The prefix that always refers to the blank-node namespace.
pub const BLANK_NODE_PREFIX: &str = "_";

/// The namespace prefixes visible at one point in the tree.
///
/// Scopes are never modified once built: deriving a child scope copies the
/// mapping only when the element declares something, otherwise the parent's
/// mapping is shared.
#[derive(Clone)]
pub struct NamespaceScope {
    blank_node_namespace: Rc<str>,
    mappings: Rc<PrefixMapping>,
}

impl NamespaceScope {
    /// The root scope, in which only `_` is bound.
    pub fn new(blank_node_namespace: &str) -> Self {
        Self {
            blank_node_namespace: Rc::from(blank_node_namespace),
            mappings: Rc::new(PrefixMapping::default()),
        }
    }

    /// Expands `prefix:reference` by plain concatenation.
    pub fn expand(&self, prefix: &str, reference: &str) -> Option<String> {
        if prefix == BLANK_NODE_PREFIX {
            let mut iri = self.blank_node_namespace.to_string();
            iri.push_str(reference);
            return Some(iri);
        }

        self.mappings
            .expand_curie(&Curie::new(Some(prefix), reference))
            .ok()
    }

    /// The namespace bound to `prefix`, if any.
    pub fn namespace(&self, prefix: &str) -> Option<String> {
        self.expand(prefix, "")
    }

    /// A copy of this scope with one more binding.
    pub fn bind(&self, prefix: &str, namespace: &str) -> Result<Self, ResolveError> {
        let mut mappings = PrefixMapping::clone(&self.mappings);
        let namespace = bind_into(&mut mappings, prefix, namespace)?;
        trace!("- bound {prefix}: to {namespace}");
        Ok(self.with_mappings(mappings))
    }

    /// Builds the scope for `element`'s children by overlaying its
    /// `xmlns:*` declarations.
    ///
    /// Alongside the scope this returns one outcome per declaration, in
    /// document order: the bound namespace, or why it was rejected.
    pub fn derive<'a>(
        &self,
        element: impl Element<'a>,
    ) -> (Self, Vec<Result<String, ResolveError>>) {
        let mut declarations = element.namespace_declarations().peekable();
        if declarations.peek().is_none() {
            return (self.clone(), Vec::new());
        }

        let mut mappings = PrefixMapping::clone(&self.mappings);
        let outcomes = declarations
            .map(|(prefix, namespace)| bind_into(&mut mappings, prefix, namespace))
            .collect();

        (self.with_mappings(mappings), outcomes)
    }

    fn with_mappings(&self, mappings: PrefixMapping) -> Self {
        Self {
            blank_node_namespace: self.blank_node_namespace.clone(),
            mappings: Rc::new(mappings),
        }
    }
}

fn bind_into(
    mappings: &mut PrefixMapping,
    prefix: &str,
    namespace: &str,
) -> Result<String, ResolveError> {
    let namespace = namespace.trim();
    let iri = IriRef::parse(namespace).map_err(|source| ResolveError::InvalidUri {
        source,
        uri: namespace.to_string(),
    })?;

    if !iri.is_absolute() {
        return Err(ResolveError::RelativeNamespace {
            uri: namespace.to_string(),
        });
    }

    mappings
        .add_prefix(prefix, namespace)
        .map_err(|_| ResolveError::InvalidPrefix {
            prefix: prefix.to_string(),
        })?;

    Ok(namespace.to_string())
}
