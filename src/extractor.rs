//! Route extraction: normalizes raw handler declarations into route descriptors.
//!
//! The registry carries handlers exactly as the user declared them, including a
//! free-form verb tag. This module resolves those tags through a lookup table
//! and produces one [`RouteDescriptor`] per recognized handler. Handlers whose
//! tag is not in the table are skipped without error; the document simply does
//! not mention them.

use crate::registry::{ResourceDecl, RouteRegistry};
use log::debug;

/// Verb tag lookup table: raw tag to verb slot.
///
/// Only these four verbs map to operation slots in the output document.
/// Anything else (e.g. "delete", "options") falls through and the handler
/// is excluded.
const VERB_TABLE: &[(&str, RouteVerb)] = &[
    ("get", RouteVerb::Get),
    ("post", RouteVerb::Post),
    ("put", RouteVerb::Put),
    ("patch", RouteVerb::Patch),
];

/// HTTP verbs recognized by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteVerb {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
}

impl RouteVerb {
    /// Uppercase wire name of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteVerb::Get => "GET",
            RouteVerb::Post => "POST",
            RouteVerb::Put => "PUT",
            RouteVerb::Patch => "PATCH",
        }
    }

    /// Capitalized name used in operation ids (e.g. "Users_Get")
    pub fn id_fragment(&self) -> &'static str {
        match self {
            RouteVerb::Get => "Get",
            RouteVerb::Post => "Post",
            RouteVerb::Put => "Put",
            RouteVerb::Patch => "Patch",
        }
    }
}

/// A single (name, type) parameter pair, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParam {
    /// Parameter name
    pub name: String,
    /// Type expression for the parameter
    pub type_name: String,
}

/// A normalized route: everything the emitter needs for one operation.
///
/// Descriptors are plain data and are not modified after extraction.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// Resolved verb slot
    pub verb: RouteVerb,
    /// Owning resource name
    pub resource: String,
    /// Handler name, used for logging and diagnostics
    pub handler_name: String,
    /// Ordered parameter pairs as declared
    pub params: Vec<RouteParam>,
    /// Return type name, if the handler declares one
    pub returns: Option<String>,
    /// Whether the owning resource requires authorization
    pub authorized: bool,
    /// Operation summary override from the manifest
    pub summary: Option<String>,
    /// Operation description override from the manifest
    pub description: Option<String>,
}

/// Resolve a raw verb tag through the lookup table.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn lookup_verb(tag: &str) -> Option<RouteVerb> {
    let tag = tag.trim().to_ascii_lowercase();
    VERB_TABLE
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, verb)| *verb)
}

/// Extract route descriptors from every resource in the registry.
///
/// Handlers with unrecognized verb tags are skipped silently. The relative
/// order of surviving handlers is preserved, which is what makes the
/// last-write-wins behavior of duplicate verbs deterministic downstream.
pub fn extract_routes(registry: &RouteRegistry) -> Vec<RouteDescriptor> {
    let mut routes = Vec::new();

    for resource in &registry.resources {
        let before = routes.len();
        extract_resource_routes(resource, &mut routes);
        debug!(
            "Resource {}: {} of {} handler(s) recognized",
            resource.name,
            routes.len() - before,
            resource.handlers.len()
        );
    }

    routes
}

fn extract_resource_routes(resource: &ResourceDecl, routes: &mut Vec<RouteDescriptor>) {
    for handler in &resource.handlers {
        let verb = match lookup_verb(&handler.verb) {
            Some(verb) => verb,
            None => {
                debug!(
                    "Skipping handler {} on {}: unrecognized verb tag {:?}",
                    handler.name, resource.name, handler.verb
                );
                continue;
            }
        };

        routes.push(RouteDescriptor {
            verb,
            resource: resource.name.clone(),
            handler_name: handler.name.clone(),
            params: handler
                .params
                .iter()
                .map(|p| RouteParam {
                    name: p.name.clone(),
                    type_name: p.type_name.clone(),
                })
                .collect(),
            returns: handler.returns.clone(),
            authorized: resource.authorized,
            summary: handler.summary.clone(),
            description: handler.description.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{HandlerDecl, ParamDecl, RouteManifest, RouteRegistry};

    fn handler(name: &str, verb: &str) -> HandlerDecl {
        HandlerDecl {
            name: name.to_string(),
            verb: verb.to_string(),
            params: Vec::new(),
            returns: None,
            summary: None,
            description: None,
        }
    }

    fn registry_with(resources: Vec<ResourceDecl>) -> RouteRegistry {
        RouteRegistry::from_manifests(vec![RouteManifest {
            resources,
            ..Default::default()
        }])
    }

    #[test]
    fn test_lookup_verb_recognized() {
        assert_eq!(lookup_verb("get"), Some(RouteVerb::Get));
        assert_eq!(lookup_verb("post"), Some(RouteVerb::Post));
        assert_eq!(lookup_verb("put"), Some(RouteVerb::Put));
        assert_eq!(lookup_verb("patch"), Some(RouteVerb::Patch));
    }

    #[test]
    fn test_lookup_verb_case_insensitive() {
        assert_eq!(lookup_verb("GET"), Some(RouteVerb::Get));
        assert_eq!(lookup_verb("Patch"), Some(RouteVerb::Patch));
        assert_eq!(lookup_verb("  put  "), Some(RouteVerb::Put));
    }

    #[test]
    fn test_lookup_verb_unrecognized() {
        assert_eq!(lookup_verb("delete"), None);
        assert_eq!(lookup_verb("options"), None);
        assert_eq!(lookup_verb("head"), None);
        assert_eq!(lookup_verb(""), None);
    }

    #[test]
    fn test_extract_single_resource() {
        let registry = registry_with(vec![ResourceDecl {
            name: "Users".to_string(),
            authorized: false,
            handlers: vec![handler("get_users", "get"), handler("create_user", "post")],
        }]);

        let routes = extract_routes(&registry);

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].verb, RouteVerb::Get);
        assert_eq!(routes[0].resource, "Users");
        assert_eq!(routes[1].verb, RouteVerb::Post);
    }

    #[test]
    fn test_extract_skips_unrecognized_verbs() {
        let registry = registry_with(vec![ResourceDecl {
            name: "Users".to_string(),
            authorized: false,
            handlers: vec![
                handler("get_users", "get"),
                handler("delete_user", "delete"),
                handler("update_user", "put"),
            ],
        }]);

        let routes = extract_routes(&registry);

        // delete is not in the verb table and is silently excluded
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].verb, RouteVerb::Get);
        assert_eq!(routes[1].verb, RouteVerb::Put);
    }

    #[test]
    fn test_extract_resource_with_no_recognized_verbs() {
        let registry = registry_with(vec![ResourceDecl {
            name: "Jobs".to_string(),
            authorized: false,
            handlers: vec![handler("run_job", "delete"), handler("peek_job", "head")],
        }]);

        let routes = extract_routes(&registry);

        assert!(routes.is_empty());
    }

    #[test]
    fn test_extract_preserves_declaration_order() {
        let registry = registry_with(vec![ResourceDecl {
            name: "Users".to_string(),
            authorized: false,
            handlers: vec![
                handler("first_get", "get"),
                handler("second_get", "get"),
            ],
        }]);

        let routes = extract_routes(&registry);

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].handler_name, "first_get");
        assert_eq!(routes[1].handler_name, "second_get");
    }

    #[test]
    fn test_extract_propagates_authorization_flag() {
        let registry = registry_with(vec![
            ResourceDecl {
                name: "Users".to_string(),
                authorized: true,
                handlers: vec![handler("get_users", "get")],
            },
            ResourceDecl {
                name: "Health".to_string(),
                authorized: false,
                handlers: vec![handler("get_health", "get")],
            },
        ]);

        let routes = extract_routes(&registry);

        assert!(routes[0].authorized);
        assert!(!routes[1].authorized);
    }

    #[test]
    fn test_extract_carries_params_in_order() {
        let registry = registry_with(vec![ResourceDecl {
            name: "Orders".to_string(),
            authorized: false,
            handlers: vec![HandlerDecl {
                name: "create_order".to_string(),
                verb: "post".to_string(),
                params: vec![
                    ParamDecl {
                        name: "order".to_string(),
                        type_name: "Order".to_string(),
                    },
                    ParamDecl {
                        name: "options".to_string(),
                        type_name: "CreateOptions".to_string(),
                    },
                ],
                returns: Some("Order".to_string()),
                summary: None,
                description: None,
            }],
        }]);

        let routes = extract_routes(&registry);

        assert_eq!(routes.len(), 1);
        let params: Vec<_> = routes[0].params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["order", "options"]);
        assert_eq!(routes[0].returns, Some("Order".to_string()));
    }
}
