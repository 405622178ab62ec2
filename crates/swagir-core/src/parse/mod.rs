pub mod operation;
pub mod parameter;
pub mod response;
pub mod schema;
pub mod security;
pub mod spec;

use crate::error::ParseError;
use spec::SwaggerDocument;

/// Parse a Swagger document from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerDocument, ParseError> {
    let doc: SwaggerDocument = serde_yaml_ng::from_str(input)?;
    validate_version(&doc)?;
    Ok(doc)
}

/// Parse a Swagger document from JSON.
pub fn from_json(input: &str) -> Result<SwaggerDocument, ParseError> {
    let doc: SwaggerDocument = serde_json::from_str(input)?;
    validate_version(&doc)?;
    Ok(doc)
}

fn validate_version(doc: &SwaggerDocument) -> Result<(), ParseError> {
    match doc.swagger.as_deref() {
        None | Some("2.0") => Ok(()),
        Some(other) => Err(ParseError::UnsupportedVersion(other.to_string())),
    }
}
