//! Finding the element whose identity is the subject of an element's
//! statements.

use crate::bnode::BlankNodeNamer;
use crate::tree::Element;

/// Walks up from `start` looking for the element that supplies the subject.
///
/// An `about` attribute always wins, even on `start`. An ancestor with `rel`
/// or `rev` but no `href` is an implicit subject. When `max_ancestors` is set
/// the search stops on the node where the count of visited nodes exceeds it.
/// `None` means the subject is the document itself.
pub fn find_about_node<'a, E: Element<'a>>(start: E, max_ancestors: Option<usize>) -> Option<E> {
    let mut node = start;
    let mut count = 0;
    loop {
        if node.attr("about").is_some() {
            return Some(node);
        }

        if node.id() != start.id()
            && (node.attr("rel").is_some() || node.attr("rev").is_some())
            && node.attr("href").is_none()
        {
            return Some(node);
        }

        count += 1;
        if max_ancestors.is_some_and(|max| count > max) {
            return Some(node);
        }

        node = node.parent()?;
    }
}

/// The unresolved subject reference for an about node.
pub fn about_uri_from_node<'a, E: Element<'a>>(
    namer: &mut BlankNodeNamer<E::Id>,
    node: Option<E>,
    is_head: bool,
) -> String {
    let Some(node) = node else {
        return String::new();
    };

    match node.attr("about") {
        Some(about) => about.to_string(),
        None => bnode_uri_from_node(namer, node, is_head),
    }
}

/// `#id` when the element has an `id`, otherwise a blank node.
///
/// With `blank_over_bnode` an element without an `id` stands for the
/// document and yields the empty reference instead.
pub fn bnode_uri_from_node<'a, E: Element<'a>>(
    namer: &mut BlankNodeNamer<E::Id>,
    node: E,
    blank_over_bnode: bool,
) -> String {
    if let Some(id) = node.attr("id") {
        format!("#{id}")
    } else if blank_over_bnode {
        String::new()
    } else {
        namer.generate(node.id())
    }
}
