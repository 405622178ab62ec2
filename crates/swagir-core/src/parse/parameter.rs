use serde::{Deserialize, Serialize};

use super::schema::Schema;

/// An API parameter.
///
/// Body parameters describe their payload with `schema`; every other
/// location uses the inline `type`/`format`/`items`/`enum` fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Parameter {
    /// The schema node describing this parameter's value: `schema` when
    /// present, otherwise one assembled from the inline fields.
    pub fn value_schema(&self) -> Schema {
        if let Some(ref schema) = self.schema {
            return schema.clone();
        }
        Schema {
            schema_type: self.param_type.clone(),
            format: self.format.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            description: self.description.clone(),
            ..Schema::default()
        }
    }
}
