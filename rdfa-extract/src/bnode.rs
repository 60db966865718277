use std::collections::HashMap;
use std::hash::Hash;

/// Namespace that generated blank-node URIs live in, unless overridden.
pub const DEFAULT_BLANK_NODE_NAMESPACE: &str = "tag:porg.es,2025:rdfa-extract/bnode#";

/// Prefix placed between the namespace and the counter.
pub const DEFAULT_BLANK_NODE_PREFIX: &str = "_a";

/// Issues blank-node names keyed by element identity.
///
/// The same element always receives the same name; new elements are numbered
/// in the order they are first seen. The table belongs to a single parse and
/// must be [`reset`](Self::reset) before it is used for another document.
#[derive(Debug)]
pub struct BlankNodeNamer<Id> {
    namespace: String,
    prefix: String,
    assigned: HashMap<Id, usize>,
    counter: usize,
}

impl<Id: Copy + Eq + Hash> BlankNodeNamer<Id> {
    pub fn new(namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            prefix: prefix.into(),
            assigned: HashMap::new(),
            counter: 0,
        }
    }

    pub fn generate(&mut self, id: Id) -> String {
        let counter = &mut self.counter;
        let number = *self.assigned.entry(id).or_insert_with(|| {
            *counter += 1;
            *counter
        });

        format!("{}{}{}", self.namespace, self.prefix, number)
    }

    pub fn reset(&mut self) {
        self.assigned.clear();
        self.counter = 0;
    }
}

impl<Id: Copy + Eq + Hash> Default for BlankNodeNamer<Id> {
    fn default() -> Self {
        Self::new(DEFAULT_BLANK_NODE_NAMESPACE, DEFAULT_BLANK_NODE_PREFIX)
    }
}
