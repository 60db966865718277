//! Extracts RDF statements from RDFa attributes in (X)HTML documents.
//!
//! The document is walked breadth first. Every element with a `rel`, `rev`
//! or `property` attribute contributes statements about its subject, which
//! is found by searching the element's ancestors. Results are reported to a
//! [`Collector`].

use std::collections::VecDeque;

use oxiri::{Iri, IriParseError};
use scraper::Html;
use tracing::{debug, trace};

pub mod bnode;
pub mod collector;
pub mod graph;
pub mod html;
pub mod resolve;
pub mod scope;
pub mod subject;
pub mod term;
pub mod tree;
pub mod xml;

pub use bnode::{BlankNodeNamer, DEFAULT_BLANK_NODE_NAMESPACE, DEFAULT_BLANK_NODE_PREFIX};
pub use collector::{Collector, DictionaryCollector, NullCollector, ScreenCollector};
pub use graph::GraphCollector;
pub use resolve::ResolveError;
pub use term::{Term, Triple, Uri};
pub use tree::{Document, Element};
pub use xml::XmlDocument;

use scope::NamespaceScope;
use subject::{about_uri_from_node, bnode_uri_from_node, find_about_node};

/// A failure that prevents a document from being processed at all.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub enum Error {
    #[display("the document has no root element")]
    NoRootElement,

    #[display("base URI must be an absolute URI: `{iri}`")]
    BaseUri { source: IriParseError, iri: String },

    #[display("XML parse error: {_0}")]
    Xml(quick_xml::Error),

    #[display("unexpected second root element <{name}>")]
    ExtraRootElement { name: String },

    #[display("element <{name}> is never closed")]
    UnclosedElement { name: String },
}

#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Relative references are resolved against this. It must be absolute.
    pub base_uri: Option<String>,
    pub blank_node_namespace: Option<String>,
    pub blank_node_prefix: Option<String>,
}

impl ParseOptions {
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    pub fn with_blank_node_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.blank_node_namespace = Some(namespace.into());
        self
    }

    pub fn with_blank_node_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_node_prefix = Some(prefix.into());
        self
    }
}

/// Parses well-formed XHTML and reports its statements to `collector`.
pub fn parse<C: Collector + ?Sized>(
    source: &str,
    options: &ParseOptions,
    collector: &mut C,
) -> Result<(), Error> {
    let processor = Processor::new(options)?;
    let document = XmlDocument::parse(source)?;
    processor.process(&document, collector)
}

/// Parses HTML5 and reports its statements to `collector`.
///
/// Markup errors are recovered by the HTML5 parser and never fail the parse.
pub fn parse_html<C: Collector + ?Sized>(
    source: &str,
    options: &ParseOptions,
    collector: &mut C,
) -> Result<(), Error> {
    let processor = Processor::new(options)?;
    let document = Html::parse_document(source);
    for err in &document.errors {
        debug!("HTML parse error: {err}");
    }

    processor.process(&document, collector)
}

/// A configured extractor. It holds no per-document state and can be reused.
#[derive(Debug)]
pub struct Processor {
    base: Option<Iri<String>>,
    blank_node_namespace: String,
    blank_node_prefix: String,
}

impl Processor {
    pub fn new(options: &ParseOptions) -> Result<Self, Error> {
        let base = options
            .base_uri
            .as_ref()
            .map(|iri| {
                Iri::parse(iri.clone()).map_err(|source| Error::BaseUri {
                    source,
                    iri: iri.clone(),
                })
            })
            .transpose()?;

        Ok(Self {
            base,
            blank_node_namespace: options
                .blank_node_namespace
                .clone()
                .unwrap_or_else(|| DEFAULT_BLANK_NODE_NAMESPACE.to_string()),
            blank_node_prefix: options
                .blank_node_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_BLANK_NODE_PREFIX.to_string()),
        })
    }

    pub fn process<D: Document + ?Sized, C: Collector + ?Sized>(
        &self,
        document: &D,
        collector: &mut C,
    ) -> Result<(), Error> {
        let root = document.root_element().ok_or(Error::NoRootElement)?;

        if let Some(base) = &self.base {
            collector.set_base_uri(base.as_str());
        }
        collector.set_blank_node_namespace(&self.blank_node_namespace);

        let head = document.xhtml_head();
        trace!("XHTML head found: {}", head.is_some());

        self.run(root, head, collector);
        Ok(())
    }

    fn run<'a, E: Element<'a>, C: Collector + ?Sized>(
        &self,
        root: E,
        head: Option<E>,
        collector: &mut C,
    ) {
        let mut namer = BlankNodeNamer::new(&*self.blank_node_namespace, &*self.blank_node_prefix);
        let mut queue = VecDeque::from([(root, NamespaceScope::new(&self.blank_node_namespace))]);

        while let Some((element, inherited)) = queue.pop_front() {
            let (scope, declarations) = inherited.derive(element);
            for declaration in declarations {
                if let Some(namespace) = recover(collector, element, declaration) {
                    collector.add_namespace(&namespace);
                }
            }

            queue.extend(element.child_elements().map(|child| (child, scope.clone())));

            let mut step = Step {
                processor: self,
                element,
                scope: &scope,
                namer: &mut namer,
                collector: &mut *collector,
            };
            step.emit(head);
        }
    }
}

/// Processing of a single element.
struct Step<'s, E, Id, C: ?Sized> {
    processor: &'s Processor,
    element: E,
    scope: &'s NamespaceScope,
    namer: &'s mut BlankNodeNamer<Id>,
    collector: &'s mut C,
}

impl<'a, E: Element<'a>, C: Collector + ?Sized> Step<'_, E, E::Id, C> {
    fn emit(&mut self, head: Option<E>) {
        let element = self.element;
        let rel = element.attr("rel");
        let rev = element.attr("rev");
        let property = element.attr("property");

        if rel.is_none() && rev.is_none() && property.is_none() {
            return;
        }

        trace!(
            "<{}> rel={rel:?} rev={rev:?} property={property:?}",
            element.tag_name()
        );

        let about = self.about(head);
        let about = self.recover(about).flatten();

        let href = self.href(rel.is_some() || rev.is_some());
        let href = self.recover(href).flatten();

        if let Some(rel) = rel {
            let predicate = resolve::resolve_curie(self.scope, rel);
            if let (Some(predicate), Some(subject), Some(object)) =
                (self.recover(predicate), &about, &href)
            {
                self.add_triple(Triple::new(subject.clone(), predicate, object.clone()));
            }
        }

        if let Some(rev) = rev {
            let predicate = resolve::resolve_curie(self.scope, rev);
            if let (Some(predicate), Some(subject), Some(object)) =
                (self.recover(predicate), &href, &about)
            {
                self.add_triple(Triple::new(subject.clone(), predicate, object.clone()));
            }
        }

        if let Some(property) = property {
            let predicate = resolve::resolve_curie(self.scope, property);
            let literal = match element.attr("content") {
                Some(content) => Some(content.to_string()),
                None if element.has_child_nodes() => Some(element.inner_markup()),
                None => None,
            };

            if let (Some(predicate), Some(subject), Some(literal)) =
                (self.recover(predicate), &about, literal)
            {
                self.add_triple(Triple::new(subject.clone(), predicate, literal));
            }
        }
    }

    fn about(&mut self, head: Option<E>) -> Result<Option<Uri>, ResolveError> {
        let link_or_meta = matches!(self.element.tag_name(), "link" | "meta");
        let about_node = find_about_node(self.element, link_or_meta.then_some(1));
        let is_head = link_or_meta
            && about_node
                .zip(head)
                .is_some_and(|(node, head)| node.id() == head.id());

        let about = about_uri_from_node(self.namer, about_node, is_head);
        self.resolve_reference(Some(&about))
    }

    /// The object of `rel` and subject of `rev`. Without an `href` the
    /// element itself stands in.
    fn href(&mut self, has_rel_or_rev: bool) -> Result<Option<Uri>, ResolveError> {
        let href = self.resolve_reference(self.element.attr("href"))?;
        if href.is_some() || !has_rel_or_rev {
            return Ok(href);
        }

        let own = bnode_uri_from_node(self.namer, self.element, false);
        self.resolve_reference(Some(&own))
    }

    fn resolve_reference(&self, value: Option<&str>) -> Result<Option<Uri>, ResolveError> {
        resolve::resolve_reference(self.scope, self.processor.base.as_ref(), value)
    }

    fn add_triple(&mut self, triple: Triple) {
        trace!("emitting {triple}");
        self.collector.add_triple(triple);
    }

    fn recover<T>(&mut self, result: Result<T, ResolveError>) -> Option<T> {
        recover(self.collector, self.element, result)
    }
}

/// Reports a failed step as a warning and carries on without its value.
fn recover<'a, E: Element<'a>, C: Collector + ?Sized, T>(
    collector: &mut C,
    element: E,
    result: Result<T, ResolveError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            let message = err.to_string();
            debug!("recovered from error at <{}>: {message}", element.tag_name());
            collector.add_warning(&message);
            collector.add_debug(&element.outer_markup(), &message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn base_uri_must_be_absolute() {
        let err = Processor::new(&ParseOptions::default().with_base_uri("/relative/")).unwrap_err();
        assert!(matches!(err, Error::BaseUri { ref iri, .. } if iri == "/relative/"));
    }

    #[test]
    fn empty_document_is_fatal() {
        let err = parse("", &ParseOptions::default(), &mut NullCollector).unwrap_err();
        assert!(matches!(err, Error::NoRootElement));
    }

    #[test]
    fn processor_is_reusable() {
        let processor = Processor::new(&ParseOptions::default()).unwrap();
        let document = XmlDocument::parse(r#"<div><p rel="r"/><p rel="r"/></div>"#).unwrap();

        let mut first = DictionaryCollector::new();
        processor.process(&document, &mut first).unwrap();
        let mut second = DictionaryCollector::new();
        processor.process(&document, &mut second).unwrap();

        assert_eq!(first.triples(), second.triples());
        assert_eq!(first.triple_count(), 2);
    }

    #[test]
    fn blank_node_options() {
        let options = ParseOptions::default()
            .with_blank_node_namespace("urn:b:")
            .with_blank_node_prefix("n");
        let mut collector = DictionaryCollector::new();
        parse(r#"<div><p rel="r"/></div>"#, &options, &mut collector).unwrap();

        assert_eq!(collector.blank_node_namespace(), Some("urn:b:"));
        assert_eq!(
            collector.objects("", "r"),
            &[Term::Uri(Uri::parse("urn:b:n1").unwrap())]
        );
    }
}
