use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A Swagger 2.0 schema node, either inline or a `$ref` to a definition.
///
/// `type` is kept as a raw string so that unknown values surface as
/// malformed-schema errors with a document path instead of a serde error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,

    /// Property name that selects the concrete subtype.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    // Enum values
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ref_and_type() {
        let json = r##"{
            "type": "object",
            "discriminator": "petType",
            "properties": {
                "owner": { "$ref": "#/definitions/Person" },
                "tags": { "type": "array", "items": { "type": "string" } }
            }
        }"##;
        let schema: Schema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.schema_type.as_deref(), Some("object"));
        assert_eq!(schema.discriminator.as_deref(), Some("petType"));
        assert_eq!(
            schema.properties["owner"].ref_path.as_deref(),
            Some("#/definitions/Person")
        );
        let items = schema.properties["tags"].items.as_ref().unwrap();
        assert_eq!(items.schema_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_properties_keep_document_order() {
        let json = r#"{ "type": "object", "properties": { "z": {"type": "string"}, "a": {"type": "string"} } }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = schema.properties.keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
