use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{JsonPath, ParseError, TransformError};
use crate::ir::*;
use crate::parse::operation::{Operation as RawOperation, PathItem};
use crate::parse::parameter::Parameter as RawParameter;
use crate::parse::response::Response as RawResponse;
use crate::parse::security::SecurityScheme as RawSecurityScheme;
use crate::parse::spec::SwaggerDocument;

use super::composition::resolve_compositions;
use super::name_normalizer::title_case;
use super::prune::prune_unused_definitions;
use super::schema_parser::SchemaParser;
use super::tag_filter::filter_by_tags;

/// Name of the service that collects operations without tags.
pub const DEFAULT_SERVICE: &str = "Default";

/// Options controlling which parts of the document end up in the IR.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Keep only services whose name is listed. Empty keeps all.
    pub tags: Vec<String>,
    /// Skip reachability pruning and keep every definition.
    pub include_unused: bool,
}

/// Transform a parsed Swagger document into the fully resolved IR.
pub fn transform(doc: &SwaggerDocument) -> Result<Spec, TransformError> {
    transform_with_options(doc, &TransformOptions::default())
}

/// Transform with explicit filtering options.
pub fn transform_with_options(
    doc: &SwaggerDocument,
    options: &TransformOptions,
) -> Result<Spec, TransformError> {
    // Phase 1: Parse definitions into the forward-reference arena
    let mut parser = SchemaParser::new(&doc.definitions)?;

    // Phase 2: Security guards
    let security = resolve_security(&doc.security_definitions)?;
    let declared: HashSet<&str> = security.iter().map(|s| s.identifier()).collect();

    // Phase 3: Operations share the parser so their references resolve
    // against the same cells
    let operations = resolve_operations(&doc.paths, &declared, &mut parser)?;

    // Phase 4: Close the arena and link allOf dependents
    let parsed = parser.finish()?;
    let mut definitions = parsed.definitions;
    resolve_compositions(&mut definitions, &parsed.compositions)?;

    // Phase 5: Group operations into services by tag
    let services = group_into_services(operations);

    let info = doc
        .info
        .as_ref()
        .map(|info| SpecInfo {
            title: info.title.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
        })
        .unwrap_or_default();

    let spec = Spec::new(info, definitions, security, services);

    // Phase 6: Filter and prune
    let spec = filter_by_tags(spec, &options.tags);
    if options.include_unused {
        return Ok(spec);
    }
    Ok(prune_unused_definitions(spec))
}

fn resolve_security(
    schemes: &IndexMap<String, RawSecurityScheme>,
) -> Result<Vec<SecurityScheme>, ParseError> {
    schemes
        .iter()
        .map(|(identifier, scheme)| {
            let path = JsonPath::from_iter(["securityDefinitions", identifier.as_str()]);
            let unknown = |path: JsonPath, reason: String| ParseError::UnknownSecurityScheme {
                path,
                reason,
            };

            match scheme.scheme_type.as_deref() {
                Some("apiKey") => {}
                Some(other) => {
                    return Err(unknown(
                        path.join("type"),
                        format!("unknown security type \"{other}\""),
                    ));
                }
                None => return Err(unknown(path, "security scheme has no type".to_string())),
            }

            let key_name = match scheme.name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => return Err(unknown(path, "no name found for key".to_string())),
            };

            let location = match scheme.location.as_deref() {
                Some("header") => ApiKeyLocation::Header,
                Some(other) => {
                    return Err(unknown(
                        path.join("in"),
                        format!("unsupported key location \"{other}\""),
                    ));
                }
                None => return Err(unknown(path, "no destination for API key".to_string())),
            };

            Ok(SecurityScheme::ApiKey(ApiKey {
                identifier: identifier.clone(),
                key_name,
                location,
                description: scheme.description.clone(),
            }))
        })
        .collect()
}

fn resolve_operations(
    paths: &IndexMap<String, PathItem>,
    declared: &HashSet<&str>,
    parser: &mut SchemaParser,
) -> Result<Vec<Operation>, ParseError> {
    let mut operations = Vec::new();

    for (route, item) in paths {
        for (method, op) in item.operations() {
            let op = build_operation(route, method, op, &item.parameters, declared, parser)?;
            operations.push(op);
        }
    }

    log::debug!("parsed {} operations", operations.len());
    Ok(operations)
}

fn build_operation(
    route: &str,
    method: HttpMethod,
    op: &RawOperation,
    shared_params: &[RawParameter],
    declared: &HashSet<&str>,
    parser: &mut SchemaParser,
) -> Result<Operation, ParseError> {
    let path = JsonPath::from_iter(["paths", route, method.key()]);

    let operation_id = op
        .operation_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ParseError::InvalidDocument {
            path: path.clone(),
            reason: "unable to locate operation ID".to_string(),
        })?;
    let owner = title_case(&operation_id);

    let mut security = Vec::new();
    for requirement in &op.security {
        for identifier in requirement.keys() {
            if !declared.contains(identifier.as_str()) {
                return Err(ParseError::InvalidDocument {
                    path: path.join("security"),
                    reason: format!("undeclared security scheme `{identifier}`"),
                });
            }
            security.push(identifier.clone());
        }
    }

    let mut responses = IndexMap::new();
    for (code, response) in &op.responses {
        let response_path = path.join("responses").join(code.as_str());
        let built = build_response(&response_path, &owner, code, response, parser)?;
        responses.insert(code.clone(), built);
    }

    let shared_path = JsonPath::from_iter(["paths", route, "parameters"]);
    let mut parameters = Vec::new();
    for (index, param) in shared_params.iter().enumerate() {
        let param_path = shared_path.join(index.to_string());
        parameters.push(build_parameter(&param_path, &owner, param, parser)?);
    }
    for (index, param) in op.parameters.iter().enumerate() {
        let param_path = path.join("parameters").join(index.to_string());
        parameters.push(build_parameter(&param_path, &owner, param, parser)?);
    }

    let built = Operation::new(
        route,
        operation_id,
        method,
        op.tags.clone(),
        security,
        responses,
        parameters,
    )?;
    Ok(built.with_summary(op.summary.clone()))
}

fn build_parameter(
    path: &JsonPath,
    owner: &str,
    param: &RawParameter,
    parser: &mut SchemaParser,
) -> Result<Parameter, ParseError> {
    let name = param
        .name
        .clone()
        .ok_or_else(|| ParseError::InvalidDocument {
            path: path.clone(),
            reason: "parameter has no name".to_string(),
        })?;

    let raw_location = param.location.as_deref().unwrap_or_default();
    let location =
        ParameterLocation::parse(raw_location).ok_or_else(|| ParseError::InvalidDocument {
            path: path.join("in"),
            reason: format!("unsupported parameter location \"{raw_location}\""),
        })?;

    let schema = match location {
        ParameterLocation::Body => {
            let schema = param
                .schema
                .as_ref()
                .ok_or_else(|| ParseError::InvalidDocument {
                    path: path.clone(),
                    reason: "body parameter has no schema".to_string(),
                })?;
            let schema_path = path.join("schema");
            if schema.ref_path.is_none() && schema.schema_type.as_deref() != Some("array") {
                return Err(ParseError::MalformedSchema {
                    path: schema_path,
                    reason: "expected $ref or array".to_string(),
                });
            }
            parser.parse_property(&schema_path, owner, &name, schema)?
        }
        ParameterLocation::Path | ParameterLocation::Query => {
            parser.parse_property(path, owner, &name, &param.value_schema())?
        }
    };

    Ok(Parameter {
        name,
        location,
        required: param.required,
        description: param.description.clone(),
        schema,
    })
}

fn build_response(
    path: &JsonPath,
    owner: &str,
    code: &str,
    response: &RawResponse,
    parser: &mut SchemaParser,
) -> Result<Response, ParseError> {
    let description = response.description.clone().unwrap_or_default();

    let Some(schema) = &response.schema else {
        return Ok(Response {
            description,
            body: ResponseBody::Empty,
        });
    };

    let schema_path = path.join("schema");
    let body = if let Some(reference) = &schema.ref_path {
        ResponseBody::Definition(parser.reference(reference, &schema_path))
    } else {
        match schema.schema_type.as_deref() {
            Some("file") => ResponseBody::File,
            Some("number") => ResponseBody::Number,
            Some("array") => ResponseBody::Array(parser.parse_array_property(
                &schema_path,
                owner,
                code,
                schema,
            )?),
            Some(other) => {
                return Err(ParseError::MalformedSchema {
                    path: schema_path,
                    reason: format!("unable to interpret response schema \"{other}\""),
                });
            }
            None => {
                return Err(ParseError::MalformedSchema {
                    path: schema_path,
                    reason: "unable to interpret response".to_string(),
                });
            }
        }
    };

    Ok(Response { description, body })
}

/// Group operations by tag. Untagged operations land in
/// [`DEFAULT_SERVICE`]; an operation with several tags appears in each.
fn group_into_services(operations: Vec<Operation>) -> Vec<Service> {
    let mut groups: IndexMap<String, Vec<Operation>> = IndexMap::new();

    for op in operations {
        if op.tags.is_empty() {
            groups
                .entry(DEFAULT_SERVICE.to_string())
                .or_default()
                .push(op);
            continue;
        }
        for tag in &op.tags {
            groups.entry(tag.clone()).or_default().push(op.clone());
        }
    }

    let mut services: Vec<Service> = groups
        .into_iter()
        .map(|(name, ops)| Service::new(&name, ops))
        .collect();

    services.sort_by(|a, b| a.name.original.cmp(&b.name.original));
    services
}
