use indexmap::IndexMap;

use crate::error::{JsonPath, ParseError};
use crate::ir::{
    ArrayProperty, DefRef, Definition, Definitions, NestedObject, NumberEnum, Object, Primitive,
    PrimitiveKind, Property, Reference, ReferenceProperty, StringEnum,
};
use crate::parse::schema::Schema;

use super::name_normalizer::class_name;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// The `$ref` string under which a definition called `name` registers.
pub fn definition_ref(name: &str) -> String {
    format!("{DEFINITIONS_PREFIX}{name}")
}

/// The definition name a `$ref` string points at.
pub fn ref_name(reference: &str) -> &str {
    match reference.strip_prefix(DEFINITIONS_PREFIX) {
        Some(name) => name,
        None => reference.rsplit('/').next().unwrap_or(reference),
    }
}

/// An object that named another definition in its `allOf`. Resolved by
/// name once every definition has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRequest {
    pub dependent: DefRef,
    pub target: String,
}

/// The output of a finished parse session.
#[derive(Debug)]
pub struct ParsedDefinitions {
    pub definitions: Definitions,
    pub compositions: Vec<CompositionRequest>,
}

/// One parse session over one document.
///
/// Owns the forward-reference arena: each `$ref` string seen gets a cell,
/// filled when the named definition is parsed. A session is bound to the
/// definitions it was created from and is consumed by
/// [`SchemaParser::finish`].
#[derive(Debug)]
pub struct SchemaParser {
    definitions: Definitions,
    first_seen: IndexMap<DefRef, JsonPath>,
    compositions: Vec<CompositionRequest>,
}

impl SchemaParser {
    /// Start a session by parsing every top-level definition of one
    /// document, in document order.
    pub fn new(schemas: &IndexMap<String, Schema>) -> Result<Self, ParseError> {
        let mut parser = Self {
            definitions: Definitions::new(),
            first_seen: IndexMap::new(),
            compositions: Vec::new(),
        };
        for (name, schema) in schemas {
            parser.parse_definition(name, schema)?;
        }
        log::debug!("parsed {} top-level definitions", schemas.len());
        Ok(parser)
    }

    fn parse_definition(&mut self, name: &str, schema: &Schema) -> Result<DefRef, ParseError> {
        let path = JsonPath::from_iter(["definitions", name]);

        if let Some(reference) = &schema.ref_path {
            let target = self.reference(reference, &path);
            let alias = Definition::Reference(Reference {
                name: name.to_string(),
                target,
            });
            return self.register(name, alias, &path);
        }

        if !schema.all_of.is_empty() {
            let (object, base) = self.parse_all_of(&path, name, schema)?;
            let id = self.register(name, Definition::Object(object), &path)?;
            if let Some(target) = base {
                self.compositions.push(CompositionRequest {
                    dependent: id,
                    target,
                });
            }
            return Ok(id);
        }

        let definition = match schema.schema_type.as_deref() {
            Some("object") => Definition::Object(self.parse_object(&path, name, schema)?),
            Some("string") if !schema.enum_values.is_empty() => {
                Definition::StringEnum(string_enum(&path, name, schema)?)
            }
            Some("number") if !schema.enum_values.is_empty() => {
                Definition::NumberEnum(number_enum(&path, name, schema)?)
            }
            Some(other @ ("string" | "number")) => {
                return Err(ParseError::MalformedSchema {
                    path,
                    reason: format!("top-level `{other}` definitions must declare an enum"),
                });
            }
            Some(other) => {
                return Err(ParseError::MalformedSchema {
                    path: path.join("type"),
                    reason: format!("unknown definition type \"{other}\""),
                });
            }
            None => {
                return Err(ParseError::MalformedSchema {
                    path,
                    reason: "definition has neither `type` nor `$ref`".to_string(),
                });
            }
        };

        self.register(name, definition, &path)
    }

    /// Parse the schema node at `path` into a property called
    /// `property_name`. `object_name` names the enclosing object and is
    /// used to synthesize names for inline objects and enums.
    pub fn parse_property(
        &mut self,
        path: &JsonPath,
        object_name: &str,
        property_name: &str,
        schema: &Schema,
    ) -> Result<Property, ParseError> {
        if let Some(reference) = &schema.ref_path {
            return Ok(self.reference_property(property_name, reference, path));
        }

        // `allOf: [{$ref}]` is a common way to annotate a plain reference.
        if schema.schema_type.is_none() && schema.properties.is_empty() {
            if let [only] = schema.all_of.as_slice() {
                if let Some(reference) = &only.ref_path {
                    return Ok(self.reference_property(
                        property_name,
                        reference,
                        &path.join("allOf").join("0"),
                    ));
                }
            }
        }

        let kind = match schema.schema_type.as_deref() {
            Some("array") => {
                let array = self.parse_array_property(path, object_name, property_name, schema)?;
                return Ok(Property::Array(array));
            }
            Some("object") => {
                let nested_name = format!("{object_name}{}", class_name(property_name));
                let object = self.parse_object(path, &nested_name, schema)?;
                return Ok(Property::Object(NestedObject {
                    name: property_name.to_string(),
                    object,
                }));
            }
            Some("string") => PrimitiveKind::String,
            Some("integer") => PrimitiveKind::Integer,
            Some("number") => PrimitiveKind::Number,
            Some("boolean") => PrimitiveKind::Boolean,
            Some(other) => {
                return Err(ParseError::MalformedSchema {
                    path: path.clone(),
                    reason: format!("unknown property type \"{other}\""),
                });
            }
            None => {
                return Err(ParseError::MalformedSchema {
                    path: path.clone(),
                    reason: "property has neither `type` nor `$ref`".to_string(),
                });
            }
        };

        if schema.enum_values.is_empty()
            || matches!(kind, PrimitiveKind::Integer | PrimitiveKind::Boolean)
        {
            return Ok(Property::Primitive(Primitive::new(
                property_name,
                kind,
                schema.format.clone(),
            )));
        }

        let enum_name = format!("{object_name}{}", class_name(property_name));
        let definition = match kind {
            PrimitiveKind::String => Definition::StringEnum(string_enum(path, &enum_name, schema)?),
            _ => Definition::NumberEnum(number_enum(path, &enum_name, schema)?),
        };
        let target = self.register(&enum_name, definition, path)?;
        log::trace!("synthesized enum {enum_name} at {path}");

        Ok(Property::Reference(ReferenceProperty {
            name: property_name.to_string(),
            target,
        }))
    }

    /// Parse an `array` node. `path` points at the array node itself.
    pub fn parse_array_property(
        &mut self,
        path: &JsonPath,
        object_name: &str,
        property_name: &str,
        schema: &Schema,
    ) -> Result<ArrayProperty, ParseError> {
        let items = schema
            .items
            .as_deref()
            .ok_or_else(|| ParseError::MissingArrayItems { path: path.clone() })?;
        let element = self.parse_property(&path.join("items"), object_name, property_name, items)?;
        Ok(ArrayProperty::new(property_name, element))
    }

    /// The shared cell for `reference`, created empty if this is the first
    /// time the string is seen. `path` is remembered for error reporting.
    pub fn reference(&mut self, reference: &str, path: &JsonPath) -> DefRef {
        let id = self.definitions.cell(reference);
        self.first_seen.entry(id).or_insert_with(|| path.clone());
        id
    }

    /// Close the session. Every cell handed out must have been filled, and
    /// alias definitions must not loop back on themselves.
    pub fn finish(self) -> Result<ParsedDefinitions, ParseError> {
        let path_for = |id: DefRef| {
            self.first_seen
                .get(&id)
                .cloned()
                .unwrap_or_else(|| JsonPath::root("definitions"))
        };

        if let Some((id, reference)) = self.definitions.unfilled().next() {
            return Err(ParseError::UnresolvedReference {
                path: path_for(id),
                reference: reference.to_string(),
            });
        }

        for (id, definition) in self.definitions.iter() {
            if let Definition::Reference(alias) = definition {
                if self.definitions.resolve_id(id).is_none() {
                    return Err(ParseError::UnresolvedReference {
                        path: JsonPath::from_iter(["definitions", alias.name.as_str()]),
                        reference: self.definitions.reference(alias.target).to_string(),
                    });
                }
            }
        }

        log::debug!(
            "schema parse finished: {} definitions, {} composition requests",
            self.definitions.len(),
            self.compositions.len()
        );

        Ok(ParsedDefinitions {
            definitions: self.definitions,
            compositions: self.compositions,
        })
    }

    fn reference_property(&mut self, name: &str, reference: &str, path: &JsonPath) -> Property {
        Property::Reference(ReferenceProperty {
            name: name.to_string(),
            target: self.reference(reference, path),
        })
    }

    fn parse_object(
        &mut self,
        path: &JsonPath,
        name: &str,
        schema: &Schema,
    ) -> Result<Object, ParseError> {
        let properties = self.parse_properties(&path.join("properties"), name, &schema.properties)?;
        Ok(Object::new(name, properties).with_discriminator(schema.discriminator.clone()))
    }

    fn parse_properties(
        &mut self,
        path: &JsonPath,
        object_name: &str,
        schemas: &IndexMap<String, Schema>,
    ) -> Result<Vec<Property>, ParseError> {
        schemas
            .iter()
            .map(|(prop_name, prop_schema)| {
                self.parse_property(&path.join(prop_name), object_name, prop_name, prop_schema)
            })
            .collect()
    }

    /// An `allOf` definition: inline members contribute properties, a single
    /// `$ref` member names the base. Returns the object and the base name.
    fn parse_all_of(
        &mut self,
        path: &JsonPath,
        name: &str,
        schema: &Schema,
    ) -> Result<(Object, Option<String>), ParseError> {
        let mut base: Option<String> = None;
        let mut properties = Vec::new();
        let mut discriminator = schema.discriminator.clone();

        for (index, member) in schema.all_of.iter().enumerate() {
            let member_path = path.join("allOf").join(index.to_string());
            if let Some(reference) = &member.ref_path {
                if base.is_some() {
                    return Err(ParseError::MalformedSchema {
                        path: member_path,
                        reason: "more than one `$ref` in allOf".to_string(),
                    });
                }
                base = Some(ref_name(reference).to_string());
                continue;
            }
            if discriminator.is_none() {
                discriminator = member.discriminator.clone();
            }
            properties.extend(self.parse_properties(
                &member_path.join("properties"),
                name,
                &member.properties,
            )?);
        }

        properties.extend(self.parse_properties(
            &path.join("properties"),
            name,
            &schema.properties,
        )?);

        let object = Object::new(name, properties).with_discriminator(discriminator);
        Ok((object, base))
    }

    fn register(
        &mut self,
        name: &str,
        definition: Definition,
        path: &JsonPath,
    ) -> Result<DefRef, ParseError> {
        let id = self.definitions.cell(&definition_ref(name));
        if self.definitions.fill(id, definition).is_err() {
            return Err(ParseError::DuplicateDefinition {
                path: path.clone(),
                name: name.to_string(),
            });
        }
        self.definitions.list(id);
        log::trace!("registered definition {name}");
        Ok(id)
    }
}

fn string_enum(path: &JsonPath, name: &str, schema: &Schema) -> Result<StringEnum, ParseError> {
    let values = schema
        .enum_values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ParseError::MalformedSchema {
                    path: path.join("enum").join(i.to_string()),
                    reason: format!("expected a string enum value, found {value}"),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StringEnum::new(name, values))
}

fn number_enum(path: &JsonPath, name: &str, schema: &Schema) -> Result<NumberEnum, ParseError> {
    let values = schema
        .enum_values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value.as_f64().ok_or_else(|| ParseError::MalformedSchema {
                path: path.join("enum").join(i.to_string()),
                reason: format!("expected a numeric enum value, found {value}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NumberEnum::new(name, values))
}
