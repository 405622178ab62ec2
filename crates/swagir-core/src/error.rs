use std::fmt;

use thiserror::Error;

/// Location of a node inside the input document, rendered dot-joined
/// (e.g. `definitions.v1ApiKey.properties.name`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath(Vec<String>);

impl JsonPath {
    pub fn root(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// A new path with `segment` appended.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported Swagger version: {0}")]
    UnsupportedVersion(String),

    #[error("malformed schema at {path}: {reason}")]
    MalformedSchema { path: JsonPath, reason: String },

    #[error("missing array items at {path}")]
    MissingArrayItems { path: JsonPath },

    #[error("unknown security scheme at {path}: {reason}")]
    UnknownSecurityScheme { path: JsonPath, reason: String },

    #[error("invalid document at {path}: {reason}")]
    InvalidDocument { path: JsonPath, reason: String },

    #[error("duplicate definition `{name}` at {path}")]
    DuplicateDefinition { path: JsonPath, name: String },

    #[error("unresolved reference `{reference}` at {path}")]
    UnresolvedReference { path: JsonPath, reference: String },

    #[error("multiple body parameters at {path}")]
    MultipleBodyParameters { path: JsonPath },
}

impl ParseError {
    /// The document path the error points at, if it carries one.
    pub fn path(&self) -> Option<&JsonPath> {
        match self {
            ParseError::MalformedSchema { path, .. }
            | ParseError::MissingArrayItems { path }
            | ParseError::UnknownSecurityScheme { path, .. }
            | ParseError::InvalidDocument { path, .. }
            | ParseError::DuplicateDefinition { path, .. }
            | ParseError::UnresolvedReference { path, .. }
            | ParseError::MultipleBodyParameters { path } => Some(path),
            ParseError::Yaml(_) | ParseError::Json(_) | ParseError::UnsupportedVersion(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(
        "definition `{target}` that `{dependent}` referenced in 'allOf' was not found in the document"
    )]
    CompositionTargetMissing { dependent: String, target: String },

    #[error("definition `{target}` that `{dependent}` referenced in 'allOf' is not an object")]
    CompositionTargetNotObject { dependent: String, target: String },

    #[error("'allOf' of `{dependent}` leads back to itself through `{target}`")]
    CompositionCycle { dependent: String, target: String },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}
