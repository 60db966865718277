use oxrdf::{BlankNode, Graph, Literal, NamedNode, Subject, TripleRef};
use tracing::trace;

use crate::collector::Collector;
use crate::term::{Term, Triple, Uri};

pub mod dc_vocab {
    pub static DESCRIPTION: oxrdf::NamedNodeRef =
        oxrdf::NamedNodeRef::new_unchecked("http://purl.org/dc/terms/description");
}

pub mod rdfa_vocab {
    pub static WARNING: oxrdf::NamedNodeRef =
        oxrdf::NamedNodeRef::new_unchecked("http://www.w3.org/ns/rdfa#Warning");
}

/// Collects into `oxrdf` graphs.
///
/// Triples go to the output graph. Warnings go to the processor graph, each
/// as an `rdfa:Warning` with a `dcterms:description`. URIs inside the
/// blank-node namespace become blank nodes.
pub struct GraphCollector<'o, 'p> {
    output_graph: &'o mut Graph,
    processor_graph: &'p mut Graph,
    blank_node_namespace: Option<String>,
}

impl<'o, 'p> GraphCollector<'o, 'p> {
    pub fn new(output_graph: &'o mut Graph, processor_graph: &'p mut Graph) -> Self {
        Self {
            output_graph,
            processor_graph,
            blank_node_namespace: None,
        }
    }

    fn resource(&self, uri: &Uri) -> Result<Subject, String> {
        let local = self
            .blank_node_namespace
            .as_deref()
            .and_then(|namespace| uri.as_str().strip_prefix(namespace));

        if let Some(id) = local {
            return BlankNode::new(id)
                .map(Subject::from)
                .map_err(|err| format!("invalid blank node name `{id}`: {err}"));
        }

        named_node(uri).map(Subject::from)
    }

    fn convert(&self, triple: &Triple) -> Result<oxrdf::Triple, String> {
        let subject = self.resource(&triple.subject)?;
        let predicate = named_node(&triple.predicate)?;
        let object = match &triple.object {
            Term::Uri(uri) => oxrdf::Term::from(self.resource(uri)?),
            Term::Literal(text) => Literal::new_simple_literal(text).into(),
        };

        Ok(oxrdf::Triple::new(subject, predicate, object))
    }
}

fn named_node(uri: &Uri) -> Result<NamedNode, String> {
    if !uri.is_absolute() {
        return Err(format!("cannot represent <{uri}> in a graph: it is not an absolute IRI"));
    }

    NamedNode::new(uri.as_str()).map_err(|err| format!("invalid IRI <{uri}>: {err}"))
}

fn emit_processor(pg: &mut Graph, msg: &str) {
    let warning_subj: Subject = BlankNode::default().into();
    // new bnode is-a rdfa:Warning
    let node = TripleRef::new(&warning_subj, oxrdf::vocab::rdf::TYPE, rdfa_vocab::WARNING);
    // add description
    let desc = TripleRef::new(
        &warning_subj,
        dc_vocab::DESCRIPTION,
        oxrdf::LiteralRef::new_simple_literal(msg),
    );
    trace!("emitting processor: {node}");
    pg.insert(node);
    trace!("emitting processor: {desc}");
    pg.insert(desc);
}

impl Collector for GraphCollector<'_, '_> {
    fn set_blank_node_namespace(&mut self, namespace: &str) {
        self.blank_node_namespace = Some(namespace.to_string());
    }

    fn add_triple(&mut self, triple: Triple) {
        match self.convert(&triple) {
            Ok(triple) => {
                self.output_graph.insert(&triple);
            }
            Err(msg) => emit_processor(self.processor_graph, &format!("{msg} (in {triple})")),
        }
    }

    fn add_warning(&mut self, message: &str) {
        emit_processor(self.processor_graph, message);
    }
}
