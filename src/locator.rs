use crate::error::{Error, Result};
use log::warn;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Route file locator.
///
/// Recursively walks a routes directory collecting files named `route.<ext>`
/// (the file stem must be exactly `route`; any extension is accepted).
/// Hidden directories and `node_modules` are skipped. Entries are visited in
/// file-name order so the scan is deterministic for a given directory tree.
pub struct RouteLocator {
    root: PathBuf,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Route file paths, relative to the scan root
    pub route_files: Vec<PathBuf>,
    /// Warnings for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl RouteLocator {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Scans the directory tree and collects all route files.
    ///
    /// Inaccessible entries below the root are logged and collected as
    /// warnings while the scan continues. An empty result is a legitimate
    /// outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if the root directory itself cannot be
    /// read.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut route_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_node_modules = file_name == "node_modules";

                !is_hidden && !is_node_modules
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_file()
                        && path.file_stem().and_then(|s| s.to_str()) == Some("route")
                    {
                        // Paths are kept relative to the root so they convert
                        // directly into API path templates
                        let relative = path.strip_prefix(&self.root).unwrap_or(path);
                        route_files.push(relative.to_path_buf());
                    }
                }
                Err(e) => {
                    if e.depth() == 0 {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk aborted"));
                        return Err(Error::Discovery {
                            dir: self.root.clone(),
                            source,
                        });
                    }
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            route_files,
            warnings,
        })
    }
}

fn bracket_segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([^\]]+)\]").expect("bracket pattern is valid"))
}

/// Converts a route file path (relative to the scan root) into its OpenAPI
/// path template.
///
/// The trailing `route.<ext>` segment is dropped, every `[name]` directory
/// segment becomes a `{name}` path parameter, separators normalize to `/`
/// and the degenerate root case maps to `/`. Pure and total: any well-formed
/// relative path yields a path template.
///
/// `users/[id]/route.ts` becomes `/users/{id}`.
pub fn to_api_path(route_file: &Path) -> String {
    let dir = route_file.parent().unwrap_or_else(|| Path::new(""));

    let segments: Vec<String> = dir
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .filter(|segment| segment != ".")
        .map(|segment| {
            bracket_segment_pattern()
                .replace_all(&segment, "{$1}")
                .into_owned()
        })
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_finds_nested_route_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("users/[id]")).unwrap();
        fs::create_dir_all(root.join("products")).unwrap();
        fs::write(root.join("route.ts"), "export function GET() {}").unwrap();
        fs::write(root.join("users/[id]/route.ts"), "export function GET() {}").unwrap();
        fs::write(root.join("products/route.js"), "export function POST() {}").unwrap();
        fs::write(root.join("products/helpers.ts"), "export const x = 1").unwrap();

        let locator = RouteLocator::new(root.to_path_buf());
        let result = locator.scan().unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(result.route_files.len(), 3);

        let names: Vec<String> = result
            .route_files
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        assert!(names.contains(&"route.ts".to_string()));
        assert!(names.contains(&"users/[id]/route.ts".to_string()));
        assert!(names.contains(&"products/route.js".to_string()));
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let locator = RouteLocator::new(temp_dir.path().to_path_buf());
        let result = locator.scan().unwrap();

        assert!(result.route_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_hidden_and_node_modules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join(".next/cache")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join(".next/cache/route.ts"), "export function GET() {}").unwrap();
        fs::write(root.join("node_modules/pkg/route.ts"), "export function GET() {}").unwrap();
        fs::write(root.join("route.ts"), "export function GET() {}").unwrap();

        let locator = RouteLocator::new(root.to_path_buf());
        let result = locator.scan().unwrap();

        assert_eq!(result.route_files.len(), 1);
        assert_eq!(result.route_files[0], PathBuf::from("route.ts"));
    }

    #[test]
    fn test_scan_ignores_other_file_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("routes.ts"), "export function GET() {}").unwrap();
        fs::write(root.join("index.ts"), "export function GET() {}").unwrap();

        let locator = RouteLocator::new(root.to_path_buf());
        let result = locator.scan().unwrap();

        assert!(result.route_files.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_discovery_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let locator = RouteLocator::new(missing);
        let result = locator.scan();

        assert!(matches!(result, Err(Error::Discovery { .. })));
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        for name in ["zebra", "alpha", "middle"] {
            fs::create_dir(root.join(name)).unwrap();
            fs::write(root.join(name).join("route.ts"), "export function GET() {}").unwrap();
        }

        let locator = RouteLocator::new(root.to_path_buf());
        let first = locator.scan().unwrap().route_files;
        let second = locator.scan().unwrap().route_files;

        assert_eq!(first, second);
        assert_eq!(first[0], PathBuf::from("alpha/route.ts"));
    }

    #[test]
    fn test_to_api_path_with_parameter() {
        assert_eq!(to_api_path(Path::new("users/[id]/route.ts")), "/users/{id}");
    }

    #[test]
    fn test_to_api_path_root() {
        assert_eq!(to_api_path(Path::new("route.ts")), "/");
    }

    #[test]
    fn test_to_api_path_plain_segment() {
        assert_eq!(to_api_path(Path::new("products/route.ts")), "/products");
    }

    #[test]
    fn test_to_api_path_nested_parameters() {
        assert_eq!(
            to_api_path(Path::new("orders/[orderId]/items/[itemId]/route.ts")),
            "/orders/{orderId}/items/{itemId}"
        );
    }

    #[test]
    fn test_to_api_path_is_deterministic() {
        let path = Path::new("users/[id]/route.ts");
        assert_eq!(to_api_path(path), to_api_path(path));
    }
}
