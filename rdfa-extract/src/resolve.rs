//! Turning attribute values into URIs.

use oxiri::{Iri, IriParseError, IriRef};

use crate::scope::NamespaceScope;
use crate::term::Uri;

/// A recoverable failure while resolving one attribute.
///
/// These never abort a parse; the processor reports them to the collector
/// and skips only the statement that needed the value.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub enum ResolveError {
    #[display("invalid curie, namespace prefix not found for {curie}")]
    UnboundPrefix { curie: String },

    #[display("invalid curie value: {curie}")]
    MalformedCurie { curie: String },

    #[display("invalid URI `{uri}`: {source}")]
    InvalidUri { source: IriParseError, uri: String },

    #[display("namespaces must be absolute URIs: {uri}")]
    RelativeNamespace { uri: String },

    #[display("invalid namespace prefix `{prefix}`")]
    InvalidPrefix { prefix: String },
}

fn parse_uri(value: impl Into<String>) -> Result<Uri, ResolveError> {
    let value = value.into();
    Uri::parse(value.as_str()).map_err(|source| ResolveError::InvalidUri { source, uri: value })
}

/// Resolves a `rel`, `rev` or `property` value.
///
/// A value without a colon is not a CURIE at all and is returned as a plain
/// URI reference, not resolved against any base. `prefix:reference` is
/// expanded by concatenating the bound namespace and the reference.
pub fn resolve_curie(scope: &NamespaceScope, value: &str) -> Result<Uri, ResolveError> {
    let malformed = || ResolveError::MalformedCurie {
        curie: value.to_string(),
    };

    if value.is_empty() {
        return Err(malformed());
    }

    let Some((prefix, reference)) = value.split_once(':') else {
        return parse_uri(value);
    };

    if reference.contains(':') {
        return Err(malformed());
    }

    let expanded = scope
        .expand(prefix, reference)
        .ok_or_else(|| ResolveError::UnboundPrefix {
            curie: value.to_string(),
        })?;

    parse_uri(expanded)
}

/// Resolves an `about` or `href` value.
///
/// `[prefix:reference]` is a safe CURIE. Anything else is a URI reference:
/// relative references are resolved against `base` if there is one, and kept
/// as written otherwise.
pub fn resolve_reference(
    scope: &NamespaceScope,
    base: Option<&Iri<String>>,
    value: Option<&str>,
) -> Result<Option<Uri>, ResolveError> {
    let Some(value) = value else {
        return Ok(None);
    };

    if let Some(curie) = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return resolve_curie(scope, curie).map(Some);
    }

    let invalid = |source| ResolveError::InvalidUri {
        source,
        uri: value.to_string(),
    };

    let reference = IriRef::parse(value).map_err(invalid)?;
    match base {
        Some(base) if !reference.is_absolute() => {
            Ok(Some(Uri::from(base.resolve(value).map_err(invalid)?)))
        }
        _ => Ok(Some(parse_uri(value)?)),
    }
}
