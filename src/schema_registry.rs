use crate::type_catalog::{PrimitiveType, ResolvedKind, TypeCatalog, TypeExpr};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Schema registry - converts declared types to document schemas.
///
/// Object types are registered under their name at most once; repeated
/// references reuse the existing entry. Types referenced by registered
/// object fields are registered transitively.
pub struct SchemaRegistry {
    /// Catalog for looking up declared types
    catalog: TypeCatalog,
    /// Registered schemas, keyed by type name
    schemas: HashMap<String, Schema>,
    /// Names currently being registered, to break reference cycles
    registering: HashSet<String>,
}

/// Schema definition in the output document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, Property>>,
    /// Required field names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Reference to a registered schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Format for primitive types (e.g. "int32", "int64", "float", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Schema {
    /// An empty schema, filled in per kind by the registry
    fn empty() -> Self {
        Self {
            schema_type: None,
            properties: None,
            required: None,
            items: None,
            reference: None,
            format: None,
        }
    }

    /// A `$ref` schema pointing at a registered type
    fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{}", name)),
            ..Self::empty()
        }
    }

    /// The untyped object placeholder used for unknown type names
    fn object_placeholder() -> Self {
        Self {
            schema_type: Some("object".to_string()),
            ..Self::empty()
        }
    }
}

/// Property definition for object schemas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// The type of the property
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Reference to a registered schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Items schema for array properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Format for primitive types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl SchemaRegistry {
    /// Create a new SchemaRegistry backed by a TypeCatalog
    pub fn new(catalog: TypeCatalog) -> Self {
        debug!("Initializing SchemaRegistry");
        Self {
            catalog,
            schemas: HashMap::new(),
            registering: HashSet::new(),
        }
    }

    /// Produce a schema for a type expression.
    ///
    /// Declared object types come back as a `$ref` and are registered as a
    /// side effect if absent. Unknown names come back as an untyped object
    /// placeholder and are not registered.
    pub fn schema_for(&mut self, expr: &TypeExpr) -> Schema {
        debug!("Generating schema for type: {}", expr.name);

        // Option<T> documents the same as T; optionality is tracked on the
        // owning object's required list instead.
        if expr.is_option {
            if let Some(inner) = &expr.inner {
                return self.schema_for(inner);
            }
        }

        if expr.is_vec {
            if let Some(inner) = &expr.inner {
                let items = self.schema_for(inner);
                return Schema {
                    schema_type: Some("array".to_string()),
                    items: Some(Box::new(items)),
                    ..Schema::empty()
                };
            }
        }

        match self.catalog.resolve(&expr.name) {
            ResolvedKind::Primitive(primitive) => primitive_to_schema(primitive),
            ResolvedKind::Object(_) => {
                self.register_object(&expr.name);
                Schema::reference_to(&expr.name)
            }
            ResolvedKind::Unknown => {
                debug!("Unknown type: {}, using object placeholder", expr.name);
                Schema::object_placeholder()
            }
        }
    }

    /// Produce a schema for a type expression given as a string.
    pub fn schema_for_name(&mut self, type_name: &str) -> Schema {
        self.schema_for(&TypeExpr::parse(type_name))
    }

    /// Register a declared object type under its name, if absent.
    fn register_object(&mut self, name: &str) {
        // Existence check guards duplicate registration
        if self.schemas.contains_key(name) {
            debug!("Schema for {} already registered", name);
            return;
        }
        // A cycle lands back here before the first registration completes;
        // the $ref emitted by the caller is enough to break it.
        if self.registering.contains(name) {
            debug!("Already registering {}, breaking reference cycle", name);
            return;
        }
        self.registering.insert(name.to_string());

        debug!("Registering object schema for: {}", name);

        let fields: Vec<(String, String)> = match self.catalog.resolve(name) {
            ResolvedKind::Object(decl) => decl
                .fields
                .iter()
                .map(|(field, type_name)| (field.clone(), type_name.clone()))
                .collect(),
            _ => {
                self.registering.remove(name);
                return;
            }
        };

        let mut properties = HashMap::new();
        let mut required = Vec::new();

        for (field_name, type_name) in fields {
            let expr = TypeExpr::parse(&type_name);
            let property = self.expr_to_property(&expr);
            properties.insert(field_name.clone(), property);

            if !expr.is_option {
                required.push(field_name);
            }
        }
        required.sort();

        let schema = Schema {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required)
            },
            ..Schema::empty()
        };

        self.schemas.insert(name.to_string(), schema);
        self.registering.remove(name);
    }

    /// Convert a field type expression to a property definition
    fn expr_to_property(&mut self, expr: &TypeExpr) -> Property {
        if expr.is_option {
            if let Some(inner) = &expr.inner {
                return self.expr_to_property(inner);
            }
        }

        if expr.is_vec {
            if let Some(inner) = &expr.inner {
                let items = self.schema_for(inner);
                return Property {
                    property_type: Some("array".to_string()),
                    reference: None,
                    items: Some(Box::new(items)),
                    format: None,
                };
            }
        }

        match self.catalog.resolve(&expr.name) {
            ResolvedKind::Primitive(primitive) => {
                let schema = primitive_to_schema(primitive);
                Property {
                    property_type: schema.schema_type,
                    reference: None,
                    items: None,
                    format: schema.format,
                }
            }
            ResolvedKind::Object(_) => {
                self.register_object(&expr.name);
                Property {
                    property_type: None,
                    reference: Some(format!("#/components/schemas/{}", expr.name)),
                    items: None,
                    format: None,
                }
            }
            ResolvedKind::Unknown => Property {
                property_type: Some("object".to_string()),
                reference: None,
                items: None,
                format: None,
            },
        }
    }

    /// All registered schemas
    pub fn schemas(&self) -> &HashMap<String, Schema> {
        &self.schemas
    }
}

/// Convert a primitive type to a document schema
fn primitive_to_schema(primitive: PrimitiveType) -> Schema {
    let (schema_type, format) = match primitive {
        PrimitiveType::String => ("string", None),
        PrimitiveType::I8 | PrimitiveType::I16 | PrimitiveType::I32 => ("integer", Some("int32")),
        PrimitiveType::I64 | PrimitiveType::I128 => ("integer", Some("int64")),
        PrimitiveType::U8 | PrimitiveType::U16 | PrimitiveType::U32 => ("integer", Some("int32")),
        PrimitiveType::U64 | PrimitiveType::U128 => ("integer", Some("int64")),
        PrimitiveType::F32 => ("number", Some("float")),
        PrimitiveType::F64 => ("number", Some("double")),
        PrimitiveType::Bool => ("boolean", None),
        PrimitiveType::Char => ("string", None),
    };

    Schema {
        schema_type: Some(schema_type.to_string()),
        format: format.map(|s| s.to_string()),
        ..Schema::empty()
    }
}
