//! Route filtering against user-supplied path patterns.

use crate::locator::to_api_path;
use log::debug;
use std::path::PathBuf;

/// Returns the subset of route files whose API path matches any of the
/// supplied patterns. An absent or empty pattern list passes every file
/// through unchanged.
///
/// Patterns come in two forms:
/// - `/users/*` matches `/users` itself and every path below it
/// - `/users` matches exactly, tolerating a single trailing slash on either
///   side
pub fn filter_routes(route_files: &[PathBuf], patterns: &[String]) -> Vec<PathBuf> {
    if patterns.is_empty() {
        return route_files.to_vec();
    }

    route_files
        .iter()
        .filter(|route_file| {
            let api_path = to_api_path(route_file);
            let matched = patterns
                .iter()
                .any(|pattern| matches_route_pattern(&api_path, pattern));
            if !matched {
                debug!("Skipping {} (no pattern match)", api_path);
            }
            matched
        })
        .cloned()
        .collect()
}

/// Tests a single API path against a single pattern, per the rules above.
pub fn matches_route_pattern(api_path: &str, pattern: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/*") {
        // The bare prefix matches, as does anything nested below it
        return api_path == prefix || api_path.starts_with(&format!("{}/", prefix));
    }

    normalize_trailing_slash(api_path) == normalize_trailing_slash(pattern)
}

fn normalize_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/')
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(path)
}
