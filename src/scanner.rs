use anyhow::Result;
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Manifest scanner for traversing registry directories.
///
/// A route registry may be split across several manifest fragments, e.g. one
/// file per resource. The `ManifestScanner` recursively walks a directory and
/// collects every manifest file (`.yaml`, `.yml` or `.json`), skipping
/// `target` and hidden directories (those starting with `.`).
///
/// # Example
///
/// ```no_run
/// use openapi_from_routes::scanner::ManifestScanner;
/// use std::path::PathBuf;
///
/// let scanner = ManifestScanner::new(PathBuf::from("./routes"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} manifest files", result.manifest_files.len());
/// ```
pub struct ManifestScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered manifest files and any warnings encountered
/// during scanning.
pub struct ScanResult {
    /// Paths to all discovered manifest files, sorted for deterministic merging
    pub manifest_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g. inaccessible directories)
    pub warnings: Vec<String>,
}

/// File extensions treated as route manifests
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

impl ManifestScanner {
    /// Creates a new `ManifestScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all manifest files.
    ///
    /// The result is sorted by path so that fragment merge order does not
    /// depend on filesystem iteration order. Inaccessible entries are logged
    /// and recorded as warnings, but scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut manifest_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                // Skip target directory and hidden directories
                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_file() && is_manifest_file(path) {
                        manifest_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        manifest_files.sort();

        Ok(ScanResult {
            manifest_files,
            warnings,
        })
    }
}

fn is_manifest_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| MANIFEST_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
