//! Route Documentation Generator - API documentation from declarative route manifests.
//!
//! This library generates an OpenAPI-style document from a statically-declared
//! route table. Instead of inspecting a running application or parsing source
//! code, callers describe their resources, handlers and referenced types in
//! manifest files (YAML or JSON); the library normalizes those declarations
//! into routes and emits a complete document.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`scanner`] - Finds manifest files under a registry directory
//! 2. [`registry`] - Loads manifests and merges fragments into a route table
//! 3. [`extractor`] - Normalizes handler declarations into route descriptors,
//!    resolving verb tags through a lookup table
//! 4. [`type_catalog`] - Resolves type expressions against declared types
//! 5. [`schema_registry`] - Converts declared types to document schemas,
//!    registering each referenced type at most once
//! 6. [`document_builder`] - Constructs the complete output document
//! 7. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_routes::{
//!     document_builder::DocumentBuilder,
//!     extractor::extract_routes,
//!     registry::load_registry,
//!     schema_registry::SchemaRegistry,
//!     serializer::serialize_yaml,
//!     type_catalog::TypeCatalog,
//! };
//! use std::path::PathBuf;
//!
//! // Load the route registry
//! let registry = load_registry(&[PathBuf::from("routes.yaml")]).unwrap();
//!
//! // Normalize handler declarations into routes
//! let routes = extract_routes(&registry);
//!
//! // Build the document
//! let catalog = TypeCatalog::new(registry.types.clone());
//! let mut schemas = SchemaRegistry::new(catalog);
//! let mut builder = DocumentBuilder::new()
//!     .with_prefix(registry.prefix.clone())
//!     .with_security_policy(registry.security.clone());
//! for route in &routes {
//!     builder.add_route(route, &mut schemas);
//! }
//! let document = builder.build(schemas);
//!
//! // Serialize to YAML
//! let yaml = serialize_yaml(&document).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod scanner;
pub mod registry;
pub mod extractor;
pub mod type_catalog;
pub mod schema_registry;
pub mod document_builder;
pub mod serializer;
pub mod error;
