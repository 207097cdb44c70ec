//! Lexical extraction of HTTP methods from route handler files.
//!
//! A method is considered implemented when the file exports a function or a
//! top-level binding named after it (`export async function GET`,
//! `export const POST = ...`). This is deliberately shallow: the binding is
//! not verified to actually be a route handler, and duplicate exports of the
//! same name collapse to one entry.

use regex::Regex;
use std::sync::OnceLock;

/// HTTP methods recognized in route handler files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// All recognized methods, in canonical order.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    /// Lowercase method name as used for OpenAPI path item keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }

    /// Uppercase method name as used in route strings ("GET /users").
    pub fn as_upper_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Case-insensitive lookup of a method name.
    pub fn parse(name: &str) -> Option<HttpMethod> {
        HttpMethod::ALL
            .iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn method_export_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)export\s+(?:async\s+)?(?:function|const|let|var)\s+(GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD)\b",
        )
        .expect("method export pattern is valid")
    })
}

/// Extracts the set of HTTP methods a route file implements.
///
/// The scan is global and case-insensitive; duplicates collapse while the
/// order of first occurrence is preserved. Malformed or empty files simply
/// yield an empty set, there is no error condition.
pub fn extract_methods(file_text: &str) -> Vec<HttpMethod> {
    let mut methods = Vec::new();
    for captures in method_export_pattern().captures_iter(file_text) {
        if let Some(method) = HttpMethod::parse(&captures[1]) {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
    }
    methods
}
