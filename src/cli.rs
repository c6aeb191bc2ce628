use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Route Documentation Generator - Generate an OpenAPI document from a declarative route manifest
#[derive(Parser, Debug)]
#[command(name = "openapi-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a route manifest file, or a directory of manifest fragments
    #[arg(value_name = "MANIFEST_PATH")]
    pub manifest_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Override the path prefix declared in the manifest
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.exists() {
        anyhow::bail!(
            "Manifest path does not exist: {}",
            args.manifest_path.display()
        );
    }

    info!("Manifest path: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref prefix) = args.prefix {
        info!("Prefix override: {}", prefix);
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::document_builder::DocumentBuilder;
    use crate::error::Error;
    use crate::extractor::extract_routes;
    use crate::registry::load_registry;
    use crate::scanner::ManifestScanner;
    use crate::schema_registry::SchemaRegistry;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use crate::type_catalog::TypeCatalog;

    info!("Starting document generation...");

    // Step 1: Collect manifest files
    let manifest_files = if args.manifest_path.is_dir() {
        info!("Scanning manifest directory...");
        let scanner = ManifestScanner::new(args.manifest_path.clone());
        let scan_result = scanner.scan()?;

        for warning in &scan_result.warnings {
            log::warn!("{}", warning);
        }

        scan_result.manifest_files
    } else {
        vec![args.manifest_path.clone()]
    };

    info!("Found {} manifest file(s)", manifest_files.len());

    if manifest_files.is_empty() {
        anyhow::bail!("No manifest files found in the directory");
    }

    // Step 2: Load and merge the route registry
    info!("Loading route registry...");
    let mut registry = load_registry(&manifest_files)?;

    if let Some(prefix) = &args.prefix {
        registry = registry.with_prefix(prefix);
    }

    if registry.resources.is_empty() {
        return Err(Error::EmptyRegistry.into());
    }

    info!(
        "Registry: {} resource(s), {} declared type(s), prefix {:?}",
        registry.resources.len(),
        registry.types.len(),
        registry.prefix
    );

    // Step 3: Extract routes through the verb lookup table
    info!("Extracting routes...");
    let routes = extract_routes(&registry);
    info!("Extracted {} route(s)", routes.len());

    if routes.is_empty() {
        log::warn!("No handler declared a recognized verb; the document will have no paths");
    }

    // Step 4: Initialize the type catalog and schema registry
    let catalog = TypeCatalog::new(registry.types.clone());
    let mut schemas = SchemaRegistry::new(catalog);

    // Step 5: Build the document
    info!("Building document...");
    let mut builder = DocumentBuilder::new()
        .with_prefix(registry.prefix.clone())
        .with_security_policy(registry.security.clone());

    let decl = &registry.info;
    if decl.title.is_some() || decl.version.is_some() || decl.description.is_some() {
        builder = builder.with_info(
            decl.title.clone().unwrap_or_else(|| "Generated API".to_string()),
            decl.version.clone().unwrap_or_else(|| "1.0.0".to_string()),
            decl.description.clone(),
        );
    }

    for route in &routes {
        debug!("Adding route: {} {}", route.verb.as_str(), route.resource);
        builder.add_route(route, &mut schemas);
    }

    let document = builder.build(schemas);
    info!("Document built successfully");

    // Step 6: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 7: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    // Step 8: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Manifest files: {}", manifest_files.len());
    info!("  - Resources declared: {}", registry.resources.len());
    info!("  - Routes documented: {}", routes.len());
    info!("  - Paths emitted: {}", document.paths.len());

    Ok(())
}
