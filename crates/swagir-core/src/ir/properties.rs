use super::definitions::{DefRef, Definitions, Object};
use crate::transform::name_normalizer::title_case;

/// The JSON type of a primitive property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Number,
    String,
}

/// Target scalar type after applying the `format` qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Date,
    DateTime,
    Bytes,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
            ScalarType::String => "string",
            ScalarType::Date => "date",
            ScalarType::DateTime => "date-time",
            ScalarType::Bytes => "bytes",
        }
    }
}

/// A boolean, integer, number or string member.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub name: String,
    pub kind: PrimitiveKind,
    pub format: Option<String>,
}

impl Primitive {
    pub fn new(name: impl Into<String>, kind: PrimitiveKind, format: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            format: format.filter(|f| !f.is_empty()),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match (self.kind, self.format.as_deref()) {
            (PrimitiveKind::Boolean, _) => ScalarType::Bool,
            (PrimitiveKind::Integer, Some("int64")) => ScalarType::Int64,
            (PrimitiveKind::Integer, _) => ScalarType::Int32,
            (PrimitiveKind::Number, Some("float")) => ScalarType::Float32,
            (PrimitiveKind::Number, _) => ScalarType::Float64,
            (PrimitiveKind::String, Some("date-time")) => ScalarType::DateTime,
            (PrimitiveKind::String, Some("date")) => ScalarType::Date,
            (PrimitiveKind::String, Some("byte" | "binary")) => ScalarType::Bytes,
            (PrimitiveKind::String, _) => ScalarType::String,
        }
    }
}

/// A list of elements described by another property.
#[derive(Debug, Clone)]
pub struct ArrayProperty {
    pub name: String,
    pub items: Box<Property>,
}

impl ArrayProperty {
    pub fn new(name: impl Into<String>, items: Property) -> Self {
        Self {
            name: name.into(),
            items: Box::new(items),
        }
    }
}

/// A member whose type is a named definition, resolved through the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceProperty {
    pub name: String,
    pub target: DefRef,
}

/// A member typed by an inline object schema, given a synthesized name.
#[derive(Debug, Clone)]
pub struct NestedObject {
    pub name: String,
    pub object: Object,
}

/// A typed, named member of an object, or the shape of a parameter.
#[derive(Debug, Clone)]
pub enum Property {
    Primitive(Primitive),
    Array(ArrayProperty),
    Reference(ReferenceProperty),
    Object(NestedObject),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Property::Primitive(p) => &p.name,
            Property::Array(a) => &a.name,
            Property::Reference(r) => &r.name,
            Property::Object(o) => &o.name,
        }
    }

    /// Human-readable type of the property, e.g. `int32`, `Pet[]`.
    ///
    /// References are reported by their resolved definition's type name, or
    /// by the raw `$ref` when the cell is still empty.
    pub fn type_name(&self, definitions: &Definitions) -> String {
        match self {
            Property::Primitive(p) => p.scalar_type().as_str().to_string(),
            Property::Array(a) => format!("{}[]", a.items.type_name(definitions)),
            Property::Reference(r) => match definitions.resolve(r.target) {
                Some(def) => def.type_name(),
                None => definitions.reference(r.target).to_string(),
            },
            Property::Object(o) => title_case(&o.object.name),
        }
    }
}
