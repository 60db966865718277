use std::fmt;

use oxiri::{Iri, IriParseError, IriRef};

/// A URI reference as produced by the resolver.
///
/// This is normally absolute, but when no base URI is configured a relative
/// reference is kept exactly as written. The empty reference denotes the
/// document itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri(String);

impl Uri {
    /// Parses a URI reference (absolute or relative).
    pub fn parse(value: impl Into<String>) -> Result<Self, IriParseError> {
        Ok(Self(IriRef::parse(value.into())?.into_inner()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the reference carries a scheme.
    pub fn is_absolute(&self) -> bool {
        Iri::parse(self.0.as_str()).is_ok()
    }
}

impl From<Iri<String>> for Uri {
    fn from(iri: Iri<String>) -> Self {
        Self(iri.into_inner())
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The object position of a statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Uri(Uri),
    Literal(String),
}

impl From<Uri> for Term {
    fn from(uri: Uri) -> Self {
        Term::Uri(uri)
    }
}

impl From<String> for Term {
    fn from(text: String) -> Self {
        Term::Literal(text)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Uri(uri) => write!(f, "<{uri}>"),
            Term::Literal(text) => write!(f, "\"{text}\""),
        }
    }
}

/// A single extracted statement.
///
/// Subjects are always URIs here: blank nodes are URIs inside the
/// blank-node namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Uri,
    pub predicate: Uri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Uri, predicate: Uri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> {} .", self.subject, self.predicate, self.object)
    }
}
