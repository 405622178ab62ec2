use std::fmt;

use super::definitions::Definitions;
use super::operations::Service;

/// A parsed, resolved Swagger document ready for emission.
#[derive(Debug, Clone)]
pub struct Spec {
    pub info: SpecInfo,
    pub definitions: Definitions,
    pub security: Vec<SecurityScheme>,
    pub services: Vec<Service>,
}

impl Spec {
    /// Assemble a spec. Definitions are listed by name and security
    /// schemes by identifier so output is deterministic.
    pub fn new(
        info: SpecInfo,
        mut definitions: Definitions,
        mut security: Vec<SecurityScheme>,
        services: Vec<Service>,
    ) -> Self {
        definitions.sort_by_name();
        security.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        Self {
            info,
            definitions,
            security,
            services,
        }
    }
}

/// API metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

/// Where an API key travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyLocation {
    Header,
}

/// A guard requiring an API key on the request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKey {
    /// Name the document uses to refer to this guard.
    pub identifier: String,
    /// Header name carrying the key.
    pub key_name: String,
    pub location: ApiKeyLocation,
    pub description: Option<String>,
}

/// A named security guard applied to operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityScheme {
    ApiKey(ApiKey),
}

impl SecurityScheme {
    pub fn identifier(&self) -> &str {
        match self {
            SecurityScheme::ApiKey(k) => &k.identifier,
        }
    }
}

impl fmt::Display for SecurityScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityScheme::ApiKey(k) => {
                write!(f, "API key `{}` found in the header", k.key_name)
            }
        }
    }
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
