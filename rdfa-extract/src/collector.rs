//! Receivers for everything a parse reports.

use std::fmt;
use std::io::{self, Write};

use indexmap::IndexMap;

use crate::term::{Term, Triple};

/// Receives the events of a parse.
///
/// Every method has a no-op default, so a collector only implements what it
/// is interested in.
pub trait Collector {
    /// Called once, before traversal, when a base URI is configured.
    fn set_base_uri(&mut self, _uri: &str) {}

    /// Called once, before traversal.
    fn set_blank_node_namespace(&mut self, _namespace: &str) {}

    /// Called for every namespace bound by an `xmlns:*` attribute. The same
    /// namespace may be reported more than once.
    fn add_namespace(&mut self, _namespace: &str) {}

    fn add_triple(&mut self, _triple: Triple) {}

    fn add_warning(&mut self, _message: &str) {}

    /// Called after every warning with the markup of the element at fault.
    fn add_debug(&mut self, _markup: &str, _message: &str) {}
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCollector;

impl Collector for NullCollector {}

/// Stores triples grouped by subject, then predicate.
///
/// Grouping keeps the order in which subjects and predicates were first
/// seen, and objects keep their emission order.
#[derive(Debug, Default)]
pub struct DictionaryCollector {
    base_uri: Option<String>,
    blank_node_namespace: Option<String>,
    namespaces: Vec<String>,
    triples: IndexMap<String, IndexMap<String, Vec<Term>>>,
    warnings: Vec<String>,
    debug: Vec<(String, String)>,
}

impl DictionaryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    pub fn blank_node_namespace(&self) -> Option<&str> {
        self.blank_node_namespace.as_deref()
    }

    /// Namespaces in first-seen order, without repeats.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn triples(&self) -> &IndexMap<String, IndexMap<String, Vec<Term>>> {
        &self.triples
    }

    /// The objects stored for one subject and predicate.
    pub fn objects(&self, subject: &str, predicate: &str) -> &[Term] {
        self.triples
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn triple_count(&self) -> usize {
        self.triples
            .values()
            .flat_map(IndexMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// `(markup, message)` pairs, one per warning.
    pub fn debug(&self) -> &[(String, String)] {
        &self.debug
    }
}

impl Collector for DictionaryCollector {
    fn set_base_uri(&mut self, uri: &str) {
        self.base_uri = Some(uri.to_string());
    }

    fn set_blank_node_namespace(&mut self, namespace: &str) {
        self.blank_node_namespace = Some(namespace.to_string());
    }

    fn add_namespace(&mut self, namespace: &str) {
        if !self.namespaces.iter().any(|known| known == namespace) {
            self.namespaces.push(namespace.to_string());
        }
    }

    fn add_triple(&mut self, triple: Triple) {
        self.triples
            .entry(triple.subject.into_string())
            .or_default()
            .entry(triple.predicate.into_string())
            .or_default()
            .push(triple.object);
    }

    fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn add_debug(&mut self, markup: &str, message: &str) {
        self.debug.push((markup.to_string(), message.to_string()));
    }
}

/// The grouped listing: each subject on its own line, its predicates
/// indented by one tab and their objects by two.
impl fmt::Display for DictionaryCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (subject, predicates) in &self.triples {
            writeln!(f, "{subject}")?;
            for (predicate, objects) in predicates {
                writeln!(f, "\t{predicate}")?;
                for object in objects {
                    writeln!(f, "\t\t{object}")?;
                }
            }
        }

        Ok(())
    }
}

/// Writes one line per event, N-Triples style, with everything that is not
/// a triple as a `#` comment.
///
/// Write errors do not interrupt the parse: the first one is kept and
/// returned by [`finish`](Self::finish), and nothing more is written.
#[derive(Debug)]
pub struct ScreenCollector<W: Write> {
    writer: W,
    print_debug: bool,
    error: Option<io::Error>,
}

impl<W: Write> ScreenCollector<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            print_debug: false,
            error: None,
        }
    }

    /// Also print the debug lines that follow each warning.
    pub fn with_debug(mut self, print_debug: bool) -> Self {
        self.print_debug = print_debug;
        self
    }

    pub fn finish(mut self) -> io::Result<W> {
        match self.error.take() {
            Some(err) => Err(err),
            None => {
                self.writer.flush()?;
                Ok(self.writer)
            }
        }
    }

    fn line(&mut self, line: fmt::Arguments<'_>) {
        if self.error.is_none() {
            if let Err(err) = writeln!(self.writer, "{line}") {
                self.error = Some(err);
            }
        }
    }
}

impl<W: Write> Collector for ScreenCollector<W> {
    fn set_base_uri(&mut self, uri: &str) {
        self.line(format_args!("# base_uri set to '{uri}'"));
    }

    fn set_blank_node_namespace(&mut self, namespace: &str) {
        self.line(format_args!("# BNode Namespace: {namespace}"));
    }

    fn add_namespace(&mut self, namespace: &str) {
        self.line(format_args!("# Namespace Added: {namespace}"));
    }

    fn add_triple(&mut self, triple: Triple) {
        self.line(format_args!("{triple}"));
    }

    fn add_warning(&mut self, message: &str) {
        self.line(format_args!("# Warning: {message}"));
    }

    fn add_debug(&mut self, markup: &str, message: &str) {
        if self.print_debug {
            self.line(format_args!("# Debug: {message}"));
            self.line(format_args!("# Debug XML: {markup}"));
        }
    }
}
