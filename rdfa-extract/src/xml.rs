//! A small arena tree for well-formed (X)HTML, built from `quick-xml` events.
//!
//! Unlike an HTML5 parser this keeps the document exactly as written: a
//! `<meta>` may have content, unknown elements nest normally, and nothing is
//! inserted or moved. Text is stored as it appears in the source (entity
//! references are not expanded) so that serializing child nodes reproduces
//! the source markup.

use std::fmt;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use crate::Error;
use crate::tree::{Document, Element};

/// Index of a node in its [`XmlDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct ElementData {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
enum NodeData {
    Element(ElementData),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

#[derive(Debug, Default)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn parse(source: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(source);
        let mut document = XmlDocument::default();
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let id = document.push_element(&start, open.last().copied())?;
                    open.push(id);
                }
                Event::Empty(start) => {
                    document.push_element(&start, open.last().copied())?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(text) => {
                    document.push_leaf(open.last().copied(), NodeData::Text(lossy(&text)));
                }
                Event::CData(cdata) => {
                    document.push_leaf(open.last().copied(), NodeData::CData(lossy(&cdata)));
                }
                Event::Comment(comment) => {
                    document.push_leaf(open.last().copied(), NodeData::Comment(lossy(&comment)));
                }
                Event::Eof => break,
                // declarations, doctypes and processing instructions carry no RDFa
                _ => {}
            }
        }

        if let Some(unclosed) = open.last().and_then(|&id| document.element(id)) {
            return Err(Error::UnclosedElement {
                name: unclosed.data.name.clone(),
            });
        }

        trace!("parsed XML document with {} nodes", document.nodes.len());
        Ok(document)
    }

    fn push_element(
        &mut self,
        start: &BytesStart<'_>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, Error> {
        let name = lossy(start.name().as_ref());
        let attributes = start
            .attributes()
            .map(|attribute| -> Result<(String, String), quick_xml::Error> {
                let attribute = attribute.map_err(quick_xml::Error::from)?;
                let key = lossy(attribute.key.as_ref());
                let value = attribute.unescape_value()?.into_owned();
                Ok((key, value))
            })
            .collect::<Result<Vec<_>, quick_xml::Error>>()?;

        if parent.is_none() && self.root.is_some() {
            return Err(Error::ExtraRootElement { name });
        }

        let id = self.push(
            parent,
            NodeData::Element(ElementData {
                name,
                attributes,
                children: Vec::new(),
            }),
        );

        if parent.is_none() {
            self.root = Some(id);
        }

        Ok(id)
    }

    fn push_leaf(&mut self, parent: Option<NodeId>, data: NodeData) {
        // text and comments outside the root element are not part of the tree
        if parent.is_some() {
            self.push(parent, data);
        }
    }

    fn push(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent, data });
        if let Some(parent) = parent {
            if let Some(Node {
                data: NodeData::Element(parent_data),
                ..
            }) = self.nodes.get_mut(parent.0)
            {
                parent_data.children.push(id);
            }
        }

        id
    }

    fn element(&self, id: NodeId) -> Option<XmlElement<'_>> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(data) => Some(XmlElement {
                document: self,
                id,
                data,
            }),
            _ => None,
        }
    }

    /// Serializes the given sibling nodes and their descendants in order.
    fn write_markup(&self, out: &mut String, ids: &[NodeId]) {
        enum Pending<'d> {
            Node(NodeId),
            EndTag(&'d str),
        }

        let mut stack: Vec<Pending<'_>> = ids.iter().rev().copied().map(Pending::Node).collect();
        while let Some(pending) = stack.pop() {
            let id = match pending {
                Pending::Node(id) => id,
                Pending::EndTag(name) => {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                    continue;
                }
            };

            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };

            match &node.data {
                NodeData::Element(data) => {
                    write_start_tag(out, data);
                    if data.children.is_empty() {
                        out.push_str("/>");
                    } else {
                        out.push('>');
                        stack.push(Pending::EndTag(&data.name));
                        stack.extend(data.children.iter().rev().copied().map(Pending::Node));
                    }
                }
                NodeData::Text(text) => out.push_str(text),
                NodeData::CData(text) => {
                    out.push_str("<![CDATA[");
                    out.push_str(text);
                    out.push_str("]]>");
                }
                NodeData::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
            }
        }
    }
}

/// Everything up to, but not including, the closing `>` or `/>`.
fn write_start_tag(out: &mut String, data: &ElementData) {
    out.push('<');
    out.push_str(&data.name);
    for (name, value) in &data.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl Document for XmlDocument {
    type Node<'a> = XmlElement<'a>;

    fn root_element(&self) -> Option<XmlElement<'_>> {
        self.root.and_then(|id| self.element(id))
    }
}

#[derive(Clone, Copy)]
pub struct XmlElement<'a> {
    document: &'a XmlDocument,
    id: NodeId,
    data: &'a ElementData,
}

impl fmt::Debug for XmlElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlElement")
            .field("id", &self.id)
            .field("name", &self.data.name)
            .finish()
    }
}

impl<'a> Element<'a> for XmlElement<'a> {
    type Id = NodeId;

    fn id(self) -> NodeId {
        self.id
    }

    fn tag_name(self) -> &'a str {
        let name = self.data.name.as_str();
        name.split_once(':').map_or(name, |(_, local)| local)
    }

    fn attr(self, name: &str) -> Option<&'a str> {
        self.data
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn namespace_declarations(self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.data.attributes.iter().filter_map(|(key, value)| {
            let prefix = key.strip_prefix("xmlns:")?;
            Some((prefix, value.as_str()))
        })
    }

    fn parent(self) -> Option<Self> {
        let parent = self.document.nodes.get(self.id.0)?.parent?;
        self.document.element(parent)
    }

    fn child_elements(self) -> impl Iterator<Item = Self> {
        self.data
            .children
            .iter()
            .filter_map(move |&child| self.document.element(child))
    }

    fn has_child_nodes(self) -> bool {
        !self.data.children.is_empty()
    }

    fn inner_markup(self) -> String {
        let mut out = String::new();
        self.document.write_markup(&mut out, &self.data.children);
        out
    }

    fn outer_markup(self) -> String {
        let mut out = String::new();
        self.document.write_markup(&mut out, &[self.id]);
        out
    }
}

impl From<quick_xml::Error> for Error {
    fn from(source: quick_xml::Error) -> Self {
        Error::Xml(source)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keeps_content_of_void_html_elements() {
        let document = XmlDocument::parse(
            "<html><head><meta property='p'>My <b>Literal</b></meta></head></html>",
        )
        .unwrap();
        let root = document.root_element().unwrap();
        let head = document.xhtml_head().unwrap();
        let meta = head.child_elements().next().unwrap();

        assert_eq!(root.tag_name(), "html");
        assert_eq!(meta.tag_name(), "meta");
        assert_eq!(meta.attr("property"), Some("p"));
        assert!(meta.has_child_nodes());
        assert_eq!(meta.inner_markup(), "My <b>Literal</b>");
        assert_eq!(meta.parent().map(Element::id), Some(head.id()));
        assert!(root.parent().is_none());
    }

    #[test]
    fn serializes_elements_and_escapes_attributes() {
        let source =
            r#"<p about="a&amp;b" rel="x"><!--c--><br/>text &amp; more<![CDATA[<raw>]]></p>"#;
        let document = XmlDocument::parse(source).unwrap();
        let p = document.root_element().unwrap();

        assert_eq!(p.attr("about"), Some("a&b"));
        assert_eq!(
            p.outer_markup(),
            r#"<p about="a&amp;b" rel="x"><!--c--><br/>text &amp; more<![CDATA[<raw>]]></p>"#
        );
        assert_eq!(p.child_elements().count(), 1);
    }

    #[test]
    fn namespace_declarations_in_order() {
        let document = XmlDocument::parse(
            r#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:foaf="http://xmlns.com/foaf/0.1/" xmlns:dc="http://purl.org/dc/terms/"/>"#,
        )
        .unwrap();
        let root = document.root_element().unwrap();

        assert_eq!(
            root.namespace_declarations().collect::<Vec<_>>(),
            vec![
                ("foaf", "http://xmlns.com/foaf/0.1/"),
                ("dc", "http://purl.org/dc/terms/"),
            ]
        );
    }

    #[test]
    fn tag_names_are_local() {
        let document = XmlDocument::parse(
            r#"<x:html xmlns:x="http://www.w3.org/1999/xhtml"><x:head/></x:html>"#,
        )
        .unwrap();
        let root = document.root_element().unwrap();

        assert_eq!(root.tag_name(), "html");
        assert!(root.outer_markup().starts_with("<x:html "));
        assert!(document.xhtml_head().is_some());
    }

    #[test]
    fn serializes_deeply_nested_markup() {
        let depth = 100_000;
        let source = format!("<div>{}x{}</div>", "<b>".repeat(depth), "</b>".repeat(depth));
        let document = XmlDocument::parse(&source).unwrap();
        let root = document.root_element().unwrap();

        assert_eq!(root.outer_markup(), source);
        assert_eq!(root.inner_markup().len(), source.len() - "<div></div>".len());
    }

    #[test]
    fn rejects_documents_without_a_single_root() {
        assert!(XmlDocument::parse("").unwrap().root_element().is_none());
        assert!(matches!(
            XmlDocument::parse("<a/><b/>"),
            Err(Error::ExtraRootElement { name }) if name == "b"
        ));
        assert!(XmlDocument::parse("<a><b></a>").is_err());
    }
}
