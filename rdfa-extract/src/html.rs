//! The processor's view of an HTML5 document parsed by `scraper`.

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};

use crate::tree::{Document, Element};

impl<'a> Element<'a> for ElementRef<'a> {
    type Id = NodeId;

    fn id(self) -> NodeId {
        NodeRef::id(&*self)
    }

    fn tag_name(self) -> &'a str {
        self.value().name()
    }

    fn attr(self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    fn namespace_declarations(self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.value().attrs.iter().filter_map(|(name, value)| {
            // html5ever only splits the prefix off inside foreign content
            let prefix = match name.prefix.as_deref() {
                Some("xmlns") => name.local.as_ref(),
                Some(_) => return None,
                None => name.local.as_ref().strip_prefix("xmlns:")?,
            };
            Some((prefix, value.as_ref()))
        })
    }

    fn parent(self) -> Option<Self> {
        NodeRef::parent(&*self).and_then(ElementRef::wrap)
    }

    fn child_elements(self) -> impl Iterator<Item = Self> {
        NodeRef::<'a, Node>::children(&*self).filter_map(ElementRef::wrap)
    }

    fn has_child_nodes(self) -> bool {
        NodeRef::has_children(&*self)
    }

    fn inner_markup(self) -> String {
        self.inner_html()
    }

    fn outer_markup(self) -> String {
        self.html()
    }
}

impl Document for Html {
    type Node<'a> = ElementRef<'a>;

    fn root_element(&self) -> Option<ElementRef<'_>> {
        Some(Html::root_element(self))
    }
}
