//! Route Documentation Generator - Command-line tool for generating API documentation.
//!
//! This binary generates an OpenAPI-style document from a declarative route
//! manifest. Resources, handlers and referenced types are declared in YAML or
//! JSON manifests; the tool normalizes them into routes and emits a complete
//! document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-routes [OPTIONS] <MANIFEST_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation from a single manifest:
//! ```bash
//! openapi-from-routes routes.yaml -o openapi.yaml
//! ```
//!
//! Merge a directory of manifest fragments into JSON documentation:
//! ```bash
//! openapi-from-routes ./routes -f json -o openapi.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-from-routes routes.yaml -v
//! ```

mod cli;
mod document_builder;
mod error;
mod extractor;
mod registry;
mod scanner;
mod schema_registry;
mod serializer;
mod type_catalog;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    // First, do a quick parse just to check for verbose flag
    let args_for_verbose = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Route Documentation Generator starting...");

    // Now do the full parse with validation
    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    // Run the main workflow
    cli::run(args)?;

    info!("Document generation completed successfully");

    Ok(())
}
