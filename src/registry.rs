//! Route registry: the statically-declared route table.
//!
//! The registry is the input side of the generator. Instead of inspecting a live
//! application, callers declare their resources, handlers and referenced types in
//! one or more manifest files (YAML or JSON). This module defines the manifest
//! data model, loads individual files and merges fragments into a single
//! [`RouteRegistry`] that the rest of the pipeline consumes.

use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default path prefix used when no manifest declares one.
pub const DEFAULT_PREFIX: &str = "/api";

/// A single route manifest file, as written by the user.
///
/// Every section is optional so that a registry can be split across fragments,
/// e.g. one file per resource plus a shared file carrying `info` and `types`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Document info section (title, version, description)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoDecl>,
    /// Static path prefix prepended to every resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Security policy applied to authorization-flagged resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityPolicy>,
    /// Named object types referenced by handler parameters and return types
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, TypeDecl>,
    /// Resource declarations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceDecl>,
}

/// Document info declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoDecl {
    /// API title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// API version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// API description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Security policy for authorization-flagged resources.
///
/// Flagged resources get one security requirement `{scheme: scopes}` on every
/// operation; unflagged resources get none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityPolicy {
    /// Name of the security scheme (e.g. "oauth2")
    #[serde(default = "SecurityPolicy::default_scheme")]
    pub scheme: String,
    /// Scopes listed in the requirement
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl SecurityPolicy {
    fn default_scheme() -> String {
        "oauth2".to_string()
    }
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            scheme: Self::default_scheme(),
            scopes: Vec::new(),
        }
    }
}

/// A named object type declared in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Field name to type expression (e.g. "id" -> "u64", "tags" -> "Vec<String>")
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// A resource declaration: one logical entity exposing a set of handlers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceDecl {
    /// Resource name, used to form the path key (e.g. "Users" -> "/api/Users")
    pub name: String,
    /// Whether operations on this resource require authorization
    #[serde(default)]
    pub authorized: bool,
    /// Handler declarations
    #[serde(default)]
    pub handlers: Vec<HandlerDecl>,
}

/// A handler declaration: one function bound to the resource under some verb tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerDecl {
    /// Handler name (informational)
    pub name: String,
    /// Raw verb tag, resolved through the extractor's lookup table
    pub verb: String,
    /// Ordered parameter declarations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDecl>,
    /// Return type name, if the handler returns a body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// Operation summary override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single (name, type) parameter pair, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name
    pub name: String,
    /// Type expression for the parameter
    #[serde(rename = "type")]
    pub type_name: String,
}

/// The merged route table consumed by the extractor and the emitter.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    /// Document info, filled with defaults where fragments were silent
    pub info: InfoDecl,
    /// Static path prefix (normalized, leading slash, no trailing slash)
    pub prefix: String,
    /// Security policy for flagged resources
    pub security: SecurityPolicy,
    /// All declared types across fragments
    pub types: BTreeMap<String, TypeDecl>,
    /// All declared resources, in fragment order
    pub resources: Vec<ResourceDecl>,
}

impl RouteRegistry {
    /// Merge manifest fragments into a single registry.
    ///
    /// The first fragment that declares `info`, `prefix` or `security` wins;
    /// later declarations are ignored with a warning. Type declarations are
    /// merged with an existence check so a name is registered at most once.
    /// Resources are concatenated in fragment order.
    pub fn from_manifests(manifests: Vec<RouteManifest>) -> Self {
        debug!("Merging {} manifest fragment(s)", manifests.len());

        let mut info: Option<InfoDecl> = None;
        let mut prefix: Option<String> = None;
        let mut security: Option<SecurityPolicy> = None;
        let mut types: BTreeMap<String, TypeDecl> = BTreeMap::new();
        let mut resources: Vec<ResourceDecl> = Vec::new();

        for manifest in manifests {
            if let Some(decl) = manifest.info {
                if info.is_some() {
                    warn!("Ignoring duplicate info section");
                } else {
                    info = Some(decl);
                }
            }
            if let Some(p) = manifest.prefix {
                if prefix.is_some() {
                    warn!("Ignoring duplicate prefix declaration: {}", p);
                } else {
                    prefix = Some(p);
                }
            }
            if let Some(s) = manifest.security {
                if security.is_some() {
                    warn!("Ignoring duplicate security section");
                } else {
                    security = Some(s);
                }
            }
            for (name, decl) in manifest.types {
                if types.contains_key(&name) {
                    warn!("Type {} already declared, keeping first declaration", name);
                } else {
                    types.insert(name, decl);
                }
            }
            resources.extend(manifest.resources);
        }

        Self {
            info: info.unwrap_or_default(),
            prefix: normalize_prefix(prefix.as_deref().unwrap_or(DEFAULT_PREFIX)),
            security: security.unwrap_or_default(),
            types,
            resources,
        }
    }

    /// Override the path prefix (used for the CLI `--prefix` flag).
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }
}

/// Normalize a prefix to `/segment[/...]` form: one leading slash, no trailing slash.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Load a single manifest file, dispatching on its extension.
///
/// `.json` files are parsed as JSON; everything else is parsed as YAML
/// (YAML is a superset of JSON, so this is also the fallback for unknown
/// extensions).
///
/// # Errors
///
/// Returns [`Error::ManifestError`] when the file cannot be read or parsed.
pub fn load_manifest(path: &Path) -> Result<RouteManifest> {
    debug!("Loading route manifest: {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| Error::ManifestError {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
    let manifest = if is_json {
        serde_json::from_str(&content).map_err(|e| Error::ManifestError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|e| Error::ManifestError {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    Ok(manifest)
}

/// Load and merge several manifest files into one registry.
pub fn load_registry(paths: &[PathBuf]) -> Result<RouteRegistry> {
    let mut manifests = Vec::new();
    for path in paths {
        manifests.push(load_manifest(path)?);
    }
    Ok(RouteRegistry::from_manifests(manifests))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "routes.yaml",
            r#"
prefix: /odata
resources:
  - name: Users
    authorized: true
    handlers:
      - name: get_users
        verb: get
        returns: User
"#,
        );

        let manifest = load_manifest(&path).unwrap();

        assert_eq!(manifest.prefix, Some("/odata".to_string()));
        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.resources[0].name, "Users");
        assert!(manifest.resources[0].authorized);
        assert_eq!(manifest.resources[0].handlers.len(), 1);
        assert_eq!(manifest.resources[0].handlers[0].verb, "get");
        assert_eq!(
            manifest.resources[0].handlers[0].returns,
            Some("User".to_string())
        );
    }

    #[test]
    fn test_load_json_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "routes.json",
            r#"{
                "resources": [
                    {
                        "name": "Orders",
                        "handlers": [
                            {"name": "create_order", "verb": "post",
                             "params": [{"name": "order", "type": "Order"}]}
                        ]
                    }
                ]
            }"#,
        );

        let manifest = load_manifest(&path).unwrap();

        assert_eq!(manifest.resources.len(), 1);
        assert!(!manifest.resources[0].authorized);
        let handler = &manifest.resources[0].handlers[0];
        assert_eq!(handler.params.len(), 1);
        assert_eq!(handler.params[0].name, "order");
        assert_eq!(handler.params[0].type_name, "Order");
    }

    #[test]
    fn test_load_manifest_with_types() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "routes.yaml",
            r#"
types:
  User:
    fields:
      id: u64
      name: String
      email: Option<String>
"#,
        );

        let manifest = load_manifest(&path).unwrap();

        let user = manifest.types.get("User").unwrap();
        assert_eq!(user.fields.len(), 3);
        assert_eq!(user.fields.get("id"), Some(&"u64".to_string()));
        assert_eq!(user.fields.get("email"), Some(&"Option<String>".to_string()));
    }

    #[test]
    fn test_load_manifest_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yaml");

        let result = load_manifest(&path);

        assert!(result.is_err());
        match result.unwrap_err() {
            Error::ManifestError { file, .. } => assert_eq!(file, path),
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_manifest_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(&temp_dir, "bad.yaml", "resources: {not: [a, list");

        let result = load_manifest(&path);

        assert!(result.is_err());
    }

    #[test]
    fn test_merge_defaults() {
        let registry = RouteRegistry::from_manifests(vec![RouteManifest::default()]);

        assert_eq!(registry.prefix, DEFAULT_PREFIX);
        assert_eq!(registry.security.scheme, "oauth2");
        assert!(registry.security.scopes.is_empty());
        assert!(registry.info.title.is_none());
        assert!(registry.resources.is_empty());
    }

    #[test]
    fn test_merge_first_prefix_wins() {
        let first = RouteManifest {
            prefix: Some("/odata".to_string()),
            ..Default::default()
        };
        let second = RouteManifest {
            prefix: Some("/v2".to_string()),
            ..Default::default()
        };

        let registry = RouteRegistry::from_manifests(vec![first, second]);

        assert_eq!(registry.prefix, "/odata");
    }

    #[test]
    fn test_merge_first_type_declaration_wins() {
        let mut first = RouteManifest::default();
        first.types.insert(
            "User".to_string(),
            TypeDecl {
                fields: [("id".to_string(), "u64".to_string())].into_iter().collect(),
            },
        );
        let mut second = RouteManifest::default();
        second.types.insert(
            "User".to_string(),
            TypeDecl {
                fields: [("id".to_string(), "String".to_string())]
                    .into_iter()
                    .collect(),
            },
        );

        let registry = RouteRegistry::from_manifests(vec![first, second]);

        assert_eq!(
            registry.types.get("User").unwrap().fields.get("id"),
            Some(&"u64".to_string())
        );
    }

    #[test]
    fn test_merge_concatenates_resources() {
        let first = RouteManifest {
            resources: vec![ResourceDecl {
                name: "Users".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let second = RouteManifest {
            resources: vec![ResourceDecl {
                name: "Orders".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let registry = RouteRegistry::from_manifests(vec![first, second]);

        let names: Vec<_> = registry.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Users", "Orders"]);
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("api/"), "/api");
        assert_eq!(normalize_prefix("/odata/v4/"), "/odata/v4");
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
    }

    #[test]
    fn test_with_prefix_override() {
        let registry =
            RouteRegistry::from_manifests(vec![RouteManifest {
                prefix: Some("/odata".to_string()),
                ..Default::default()
            }])
            .with_prefix("v3/");

        assert_eq!(registry.prefix, "/v3");
    }
}
