use openapi_from_routes::{
    document_builder::DocumentBuilder,
    extractor::extract_routes,
    registry::load_registry,
    scanner::ManifestScanner,
    schema_registry::SchemaRegistry,
    type_catalog::TypeCatalog,
};
use tempfile::TempDir;

/// Helper function to materialize the fragment fixtures in a temporary directory
fn create_fragment_dir() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let fragments = [
        ("shared.yaml", include_str!("fixtures/shared_fragment.yaml")),
        ("users.yaml", include_str!("fixtures/users_fragment.yaml")),
        ("orders.yaml", include_str!("fixtures/orders_fragment.yaml")),
    ];
    for (name, content) in fragments {
        std::fs::write(temp_dir.path().join(name), content).expect("Failed to write fragment");
    }

    temp_dir
}

#[test]
fn test_scan_finds_all_fragments() {
    let temp_dir = create_fragment_dir();

    let scanner = ManifestScanner::new(temp_dir.path().to_path_buf());
    let result = scanner.scan().expect("Failed to scan fragment directory");

    assert_eq!(result.manifest_files.len(), 3);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_fragments_merge_into_one_registry() {
    let temp_dir = create_fragment_dir();

    let scanner = ManifestScanner::new(temp_dir.path().to_path_buf());
    let scan_result = scanner.scan().unwrap();
    let registry = load_registry(&scan_result.manifest_files).expect("Failed to load registry");

    // info and prefix come from the shared fragment
    assert_eq!(registry.info.title, Some("Fragmented API".to_string()));
    assert_eq!(registry.prefix, "/api");

    // Types merge across fragments
    assert!(registry.types.contains_key("User"));
    assert!(registry.types.contains_key("Order"));

    // Resources from every fragment survive
    let names: Vec<_> = registry.resources.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"Users"));
    assert!(names.contains(&"Orders"));
}

#[test]
fn test_merged_registry_builds_one_document() {
    let temp_dir = create_fragment_dir();

    let scanner = ManifestScanner::new(temp_dir.path().to_path_buf());
    let scan_result = scanner.scan().unwrap();
    let registry = load_registry(&scan_result.manifest_files).unwrap();

    let routes = extract_routes(&registry);
    assert_eq!(routes.len(), 3);

    let catalog = TypeCatalog::new(registry.types.clone());
    let mut schemas = SchemaRegistry::new(catalog);
    let mut builder = DocumentBuilder::new()
        .with_prefix(registry.prefix.clone())
        .with_security_policy(registry.security.clone());
    for route in &routes {
        builder.add_route(route, &mut schemas);
    }
    let document = builder.build(schemas);

    assert_eq!(document.paths.len(), 2);
    assert!(document.paths.contains_key("/api/Users"));
    assert!(document.paths.contains_key("/api/Orders"));

    // Cross-fragment reference: the Orders fragment's type is registered
    // alongside the shared fragment's User
    let schemas_section = document.components.unwrap().schemas.unwrap();
    assert!(schemas_section.contains_key("User"));
    assert!(schemas_section.contains_key("Order"));

    let order = &schemas_section["Order"];
    let properties = order.properties.as_ref().unwrap();
    assert_eq!(
        properties["items"].property_type,
        Some("array".to_string())
    );
}

#[test]
fn test_duplicate_type_across_fragments_keeps_first() {
    let temp_dir = TempDir::new().unwrap();

    // Scan order is sorted by path, so a.yaml merges before b.yaml
    std::fs::write(
        temp_dir.path().join("a.yaml"),
        "types:\n  User:\n    fields:\n      id: u64\n",
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("b.yaml"),
        "types:\n  User:\n    fields:\n      id: String\n",
    )
    .unwrap();

    let scanner = ManifestScanner::new(temp_dir.path().to_path_buf());
    let scan_result = scanner.scan().unwrap();
    let registry = load_registry(&scan_result.manifest_files).unwrap();

    assert_eq!(
        registry.types["User"].fields.get("id"),
        Some(&"u64".to_string())
    );
}

#[test]
fn test_prefix_override_applies_to_merged_registry() {
    let temp_dir = create_fragment_dir();

    let scanner = ManifestScanner::new(temp_dir.path().to_path_buf());
    let scan_result = scanner.scan().unwrap();
    let registry = load_registry(&scan_result.manifest_files)
        .unwrap()
        .with_prefix("/v2");

    assert_eq!(registry.prefix, "/v2");

    let routes = extract_routes(&registry);
    let catalog = TypeCatalog::new(registry.types.clone());
    let mut schemas = SchemaRegistry::new(catalog);
    let mut builder = DocumentBuilder::new().with_prefix(registry.prefix.clone());
    for route in &routes {
        builder.add_route(route, &mut schemas);
    }
    let document = builder.build(schemas);

    assert!(document.paths.contains_key("/v2/Users"));
    assert!(document.paths.contains_key("/v2/Orders"));
}
