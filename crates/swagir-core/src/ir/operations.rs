use indexmap::IndexMap;

use super::definitions::DefRef;
use super::properties::{ArrayProperty, Property};
use super::types::NormalizedName;
use crate::error::{JsonPath, ParseError};
use crate::transform::name_normalizer::normalize_name;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Lower-case key used under a path item in the document.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
}

impl ParameterLocation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "body" => Some(ParameterLocation::Body),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Body => "body",
        }
    }
}

/// A request parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Property,
}

/// What a response carries.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    /// A named definition.
    Definition(DefRef),
    /// Raw bytes.
    File,
    /// A bare number.
    Number,
    Array(ArrayProperty),
    /// No body.
    Empty,
}

/// One of potentially many responses an operation can receive.
#[derive(Debug, Clone)]
pub struct Response {
    pub description: String,
    pub body: ResponseBody,
}

/// One HTTP method on one route.
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: NormalizedName,
    pub route: String,
    pub operation_id: String,
    pub method: HttpMethod,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    /// Names of the security guards applied, sorted.
    pub security: Vec<String>,
    /// Status code (or `default`) to response, sorted by code.
    pub responses: IndexMap<String, Response>,
    pub parameters: Vec<Parameter>,
}

impl Operation {
    /// Build an operation, rejecting more than one body parameter.
    pub fn new(
        route: impl Into<String>,
        operation_id: impl Into<String>,
        method: HttpMethod,
        tags: Vec<String>,
        mut security: Vec<String>,
        mut responses: IndexMap<String, Response>,
        parameters: Vec<Parameter>,
    ) -> Result<Self, ParseError> {
        let route = route.into();
        let operation_id = operation_id.into();

        let body_count = parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Body)
            .count();
        if body_count > 1 {
            return Err(ParseError::MultipleBodyParameters {
                path: JsonPath::from_iter(["paths", route.as_str(), method.key(), "parameters"]),
            });
        }

        security.sort();
        responses.sort_by(|a, _, b, _| response_code_order(a).cmp(&response_code_order(b)));

        Ok(Self {
            name: normalize_name(&operation_id),
            route,
            operation_id,
            method,
            summary: None,
            tags,
            security,
            responses,
            parameters,
        })
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }

    pub fn body_parameter(&self) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Body)
    }

    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(move |p| p.location == location)
    }
}

/// Numeric codes first in ascending order, then anything else (`default`)
/// in lexical order.
fn response_code_order(code: &str) -> (u8, u32, &str) {
    match code.parse::<u32>() {
        Ok(n) => (0, n, code),
        Err(_) => (1, 0, code),
    }
}

/// A named group of operations, derived from operation tags.
#[derive(Debug, Clone)]
pub struct Service {
    pub name: NormalizedName,
    pub operations: Vec<Operation>,
}

impl Service {
    pub fn new(name: &str, operations: Vec<Operation>) -> Self {
        Self {
            name: normalize_name(name),
            operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::properties::{Primitive, PrimitiveKind};

    fn param(name: &str, location: ParameterLocation) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            required: false,
            description: None,
            schema: Property::Primitive(Primitive::new(name, PrimitiveKind::String, None)),
        }
    }

    fn response(body: ResponseBody) -> Response {
        Response {
            description: String::new(),
            body,
        }
    }

    #[test]
    fn test_multiple_body_parameters_rejected() {
        let result = Operation::new(
            "/pets",
            "createPet",
            HttpMethod::Post,
            vec![],
            vec![],
            IndexMap::new(),
            vec![
                param("a", ParameterLocation::Body),
                param("b", ParameterLocation::Body),
            ],
        );
        match result {
            Err(ParseError::MultipleBodyParameters { path }) => {
                assert_eq!(path.to_string(), "paths./pets.post.parameters");
            }
            other => panic!("expected MultipleBodyParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_single_body_parameter() {
        let op = Operation::new(
            "/pets/{id}",
            "update_pet",
            HttpMethod::Put,
            vec![],
            vec!["b".into(), "a".into()],
            IndexMap::new(),
            vec![
                param("id", ParameterLocation::Path),
                param("pet", ParameterLocation::Body),
                param("dryRun", ParameterLocation::Query),
            ],
        )
        .unwrap();
        assert_eq!(op.body_parameter().unwrap().name, "pet");
        assert_eq!(op.parameters_in(ParameterLocation::Query).count(), 1);
        assert_eq!(op.security, vec!["a", "b"]);
        assert_eq!(op.name.pascal_case, "UpdatePet");
    }

    #[test]
    fn test_responses_sorted_by_code() {
        let mut responses = IndexMap::new();
        responses.insert("default".to_string(), response(ResponseBody::Empty));
        responses.insert("404".to_string(), response(ResponseBody::Number));
        responses.insert("200".to_string(), response(ResponseBody::File));
        let op = Operation::new(
            "/x",
            "x",
            HttpMethod::Get,
            vec![],
            vec![],
            responses,
            vec![],
        )
        .unwrap();
        let codes: Vec<_> = op.responses.keys().map(String::as_str).collect();
        assert_eq!(codes, vec!["200", "404", "default"]);
    }
}
