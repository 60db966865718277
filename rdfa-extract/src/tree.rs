//! The read-only view of a parsed document that the processor walks.
//!
//! Two trees implement it: [`XmlDocument`](crate::xml::XmlDocument) for
//! well-formed XHTML, and [`scraper::Html`] for HTML5 input.

use std::fmt::Debug;
use std::hash::Hash;

/// A handle to an element node.
///
/// Blank-node naming is keyed on [`Element::id`], not on content.
pub trait Element<'a>: Copy + 'a {
    type Id: Copy + Eq + Hash + Debug;

    fn id(self) -> Self::Id;

    /// The local tag name.
    fn tag_name(self) -> &'a str;

    fn attr(self, name: &str) -> Option<&'a str>;

    /// `(prefix, value)` for each `xmlns:prefix="value"` attribute, in
    /// document order.
    fn namespace_declarations(self) -> impl Iterator<Item = (&'a str, &'a str)>;

    /// The parent element; `None` at the root.
    fn parent(self) -> Option<Self>;

    fn child_elements(self) -> impl Iterator<Item = Self>;

    /// Whether the element has any child node at all, text included.
    fn has_child_nodes(self) -> bool;

    /// The serialized markup of all child nodes.
    fn inner_markup(self) -> String;

    /// The serialized markup of the element itself.
    fn outer_markup(self) -> String;
}

pub trait Document {
    type Node<'a>: Element<'a>
    where
        Self: 'a;

    fn root_element(&self) -> Option<Self::Node<'_>>;

    /// The `/html/head` element, if this is an XHTML document.
    ///
    /// Metadata elements whose subject search ends here describe the
    /// document rather than the head.
    fn xhtml_head(&self) -> Option<Self::Node<'_>> {
        let root = self.root_element()?;
        if root.tag_name() != "html" {
            return None;
        }

        root.child_elements()
            .filter(|child| child.tag_name() == "head")
            .last()
    }
}
