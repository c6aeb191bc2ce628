use crate::extractor::{RouteDescriptor, RouteVerb};
use crate::registry::SecurityPolicy;
use crate::schema_registry::{Schema, SchemaRegistry};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The six standard query parameters attached to every GET operation.
const STANDARD_QUERY_PARAMETERS: &[(&str, &str)] = &[
    ("$expand", "Expands related entities inline."),
    ("$filter", "Filters the results, based on a Boolean condition."),
    ("$select", "Selects which properties to include in the response."),
    ("$orderby", "Sorts the results."),
    ("$top", "Returns only the first n results."),
    ("$skip", "Skips the first n results."),
];

/// Document builder - turns route descriptors into the output document
pub struct DocumentBuilder {
    /// Document info section
    info: Info,
    /// Static path prefix prepended to resource names
    prefix: String,
    /// Security policy applied to authorization-flagged routes
    security: SecurityPolicy,
    /// Paths collection (path key -> PathEntry)
    paths: HashMap<String, PathEntry>,
    /// Whether any emitted operation carries a security requirement
    security_used: bool,
}

/// Document Info object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Path entry - the operations documented for a single path.
///
/// One entry exists per resource, with a mutually exclusive slot per verb.
/// A resource declaring the same verb twice overwrites the earlier slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathEntry {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

/// A single documented operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Grouping tags; operations are tagged with their resource name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Parameters (query and body)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// Responses keyed by status code
    pub responses: HashMap<String, Response>,
    /// Security requirements; present only on authorization-flagged resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<HashMap<String, Vec<String>>>>,
}

/// Parameter object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter location (query or body)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter schema
    pub schema: Schema,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// MediaType object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for this media type
    pub schema: Schema,
}

/// Response object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<HashMap<String, MediaType>>,
}

/// Components object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<HashMap<String, Schema>>,
    /// Security scheme definitions
    #[serde(rename = "securitySchemes", skip_serializing_if = "Option::is_none")]
    pub security_schemes: Option<HashMap<String, SecurityScheme>>,
}

/// Security scheme declaration under components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScheme {
    /// Scheme type (e.g. "oauth2")
    #[serde(rename = "type")]
    pub scheme_type: String,
    /// Scheme description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Complete output document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document schema version
    pub openapi: String,
    /// API info
    pub info: Info,
    /// API paths
    pub paths: HashMap<String, PathEntry>,
    /// Components (schemas, security schemes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl DocumentBuilder {
    /// Create a new DocumentBuilder with default info and an empty prefix
    pub fn new() -> Self {
        debug!("Initializing DocumentBuilder");
        Self {
            info: Info {
                title: "Generated API".to_string(),
                version: "1.0.0".to_string(),
                description: Some("API documentation generated from a route manifest".to_string()),
            },
            prefix: String::new(),
            security: SecurityPolicy::default(),
            paths: HashMap::new(),
            security_used: false,
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        self.info = Info {
            title,
            version,
            description,
        };
        self
    }

    /// Set the static path prefix
    pub fn with_prefix(mut self, prefix: String) -> Self {
        self.prefix = prefix;
        self
    }

    /// Set the security policy for authorization-flagged routes
    pub fn with_security_policy(mut self, policy: SecurityPolicy) -> Self {
        self.security = policy;
        self
    }

    /// Add a route to the document.
    ///
    /// The route lands in its resource's path entry under its verb slot.
    /// Adding two routes with the same resource and verb keeps the later one.
    pub fn add_route(&mut self, route: &RouteDescriptor, schemas: &mut SchemaRegistry) {
        let path_key = self.path_key(&route.resource);
        debug!("Adding route: {} {}", route.verb.as_str(), path_key);

        let mut parameters = Vec::new();

        // GET operations document the standard query surface
        if route.verb == RouteVerb::Get {
            for (name, description) in STANDARD_QUERY_PARAMETERS {
                parameters.push(Parameter {
                    name: (*name).to_string(),
                    location: "query".to_string(),
                    required: false,
                    schema: string_schema(),
                    description: Some((*description).to_string()),
                });
            }
        }

        // Declared parameters become body parameters; their types are
        // registered as a side effect of schema generation
        for param in &route.params {
            let schema = schemas.schema_for_name(&param.type_name);
            parameters.push(Parameter {
                name: param.name.clone(),
                location: "body".to_string(),
                required: true,
                schema,
                description: None,
            });
        }

        let response = match &route.returns {
            Some(return_type) => {
                let items = schemas.schema_for_name(return_type);
                let array = Schema {
                    schema_type: Some("array".to_string()),
                    items: Some(Box::new(items)),
                    ..empty_schema()
                };
                Response {
                    description: return_type.clone(),
                    content: Some(
                        [(
                            "application/json".to_string(),
                            MediaType { schema: array },
                        )]
                        .into_iter()
                        .collect(),
                    ),
                }
            }
            None => Response {
                description: "Successful response".to_string(),
                content: None,
            },
        };

        let mut responses = HashMap::new();
        responses.insert("200".to_string(), response);

        let security = if route.authorized {
            self.security_used = true;
            let requirement: HashMap<String, Vec<String>> = [(
                self.security.scheme.clone(),
                self.security.scopes.clone(),
            )]
            .into_iter()
            .collect();
            Some(vec![requirement])
        } else {
            None
        };

        let operation = Operation {
            summary: route
                .summary
                .clone()
                .or_else(|| Some(format!("{} {}", route.verb.as_str(), path_key))),
            description: route.description.clone(),
            operation_id: Some(format!("{}_{}", route.resource, route.verb.id_fragment())),
            tags: Some(vec![route.resource.clone()]),
            parameters: if parameters.is_empty() {
                None
            } else {
                Some(parameters)
            },
            responses,
            security,
        };

        let path_entry = self.paths.entry(path_key).or_default();
        match route.verb {
            RouteVerb::Get => path_entry.get = Some(operation),
            RouteVerb::Post => path_entry.post = Some(operation),
            RouteVerb::Put => path_entry.put = Some(operation),
            RouteVerb::Patch => path_entry.patch = Some(operation),
        }
    }

    /// Path key for a resource: static prefix + "/" + resource name
    fn path_key(&self, resource: &str) -> String {
        format!("{}/{}", self.prefix, resource)
    }

    /// Build the final document
    pub fn build(self, schemas: SchemaRegistry) -> Document {
        debug!("Building final document");

        let registered = schemas.schemas();
        let schema_section = if registered.is_empty() {
            None
        } else {
            Some(registered.clone())
        };

        let scheme_section = if self.security_used {
            let scheme = SecurityScheme {
                scheme_type: self.security.scheme.clone(),
                description: None,
            };
            Some(
                [(self.security.scheme.clone(), scheme)]
                    .into_iter()
                    .collect::<HashMap<_, _>>(),
            )
        } else {
            None
        };

        let components = if schema_section.is_none() && scheme_section.is_none() {
            None
        } else {
            Some(Components {
                schemas: schema_section,
                security_schemes: scheme_section,
            })
        };

        Document {
            openapi: "3.0.0".to_string(),
            info: self.info,
            paths: self.paths,
            components,
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_schema() -> Schema {
    Schema {
        schema_type: None,
        properties: None,
        required: None,
        items: None,
        reference: None,
        format: None,
    }
}

fn string_schema() -> Schema {
    Schema {
        schema_type: Some("string".to_string()),
        ..empty_schema()
    }
}
