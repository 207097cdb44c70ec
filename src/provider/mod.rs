//! Enrichment provider boundary.
//!
//! The pipeline treats text generation as an opaque asynchronous capability
//! with a single operation: given a route file, an HTTP method and a
//! composed route string, produce an OpenAPI operation description. Concrete
//! backends live in submodules and register through [`create_provider`], so
//! the processor never branches on provider names.

pub mod anthropic;
pub mod openai;

use crate::document::Operation;
use crate::error::Error;
use crate::extractor::HttpMethod;
use anyhow::Result;
use futures::future::BoxFuture;
use log::{debug, error};
use regex::Regex;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Completion limits applied to every enrichment request.
pub const MAX_COMPLETION_TOKENS: u32 = 1000;
pub const COMPLETION_TOP_P: f32 = 0.8;

/// A pluggable text-generation backend.
///
/// Implementations may fail with an arbitrary error carrying a
/// human-readable message; the processor recovers per call. No timeout is
/// enforced at this boundary.
pub trait EnrichmentProvider: Send + Sync {
    /// Generates the operation description for one (route file, method)
    /// pair. `route` is the composed `"METHOD /path"` string.
    fn generate<'a>(
        &'a self,
        file_path: &'a Path,
        method: HttpMethod,
        route: &'a str,
    ) -> BoxFuture<'a, Result<Operation>>;
}

/// Recognized provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Anthropic, ProviderKind::OpenAi];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Model used when the user does not pass one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }

    /// Environment variable consulted for the API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ProviderKind::ALL
            .iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| {
                let available: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.name()).collect();
                Error::Config(format!(
                    "Invalid provider \"{}\". Available providers: {}",
                    s,
                    available.join(" | ")
                ))
            })
    }
}

/// Provider registry: maps an identifier to a backend constructor.
pub fn create_provider(
    kind: ProviderKind,
    api_key: String,
    model: String,
) -> Box<dyn EnrichmentProvider> {
    match kind {
        ProviderKind::Anthropic => Box::new(anthropic::AnthropicProvider::new(api_key, model)),
        ProviderKind::OpenAi => Box::new(openai::OpenAiProvider::new(api_key, model)),
    }
}

/// Fallback operation used when a route file holds no recognizable handler
/// implementation for the method; backends return it without calling the
/// model.
pub fn stub_operation(route: &str) -> Operation {
    Operation {
        summary: format!("{} endpoint", route),
        description: "No detailed description available".to_string(),
        parameters: None,
        request_body: None,
    }
}

fn json_fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*(\{[\s\S]*?\})\s*```").expect("fence pattern is valid")
    })
}

fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(captures) = json_fence_pattern().captures(text) {
        return captures.get(1).map(|m| m.as_str());
    }

    // Broadest brace span, for responses with prose around bare JSON
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

/// Parses a model response into an [`Operation`].
///
/// The JSON payload is located inside code fences or surrounding prose, and
/// empty summary/description fields fall back to fixed strings. A response
/// that cannot be deserialized at all yields a stub operation rather than an
/// error, so one badly-formatted response never loses the route.
pub fn parse_operation(response_text: &str) -> Operation {
    let json_text = extract_json_block(response_text).unwrap_or(response_text);

    match serde_json::from_str::<Operation>(json_text) {
        Ok(mut operation) => {
            if operation.summary.is_empty() {
                operation.summary = "API endpoint".to_string();
            }
            if operation.description.is_empty() {
                operation.description = "No description available".to_string();
            }
            operation
        }
        Err(e) => {
            error!("Failed to parse model response: {}", e);
            debug!("Raw response: {}", response_text);
            Operation {
                summary: "API endpoint".to_string(),
                description: "Failed to parse model response".to_string(),
                parameters: None,
                request_body: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_provider_kind_parses_case_insensitively() {
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = "gemini".parse::<ProviderKind>().unwrap_err();
        let message = err.to_string();

        assert!(message.contains("gemini"));
        assert!(message.contains("anthropic | openai"));
    }

    #[test]
    fn test_default_models() {
        assert_eq!(ProviderKind::Anthropic.default_model(), "claude-3-5-sonnet-latest");
        assert_eq!(ProviderKind::OpenAi.default_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_parse_operation_from_fenced_json() {
        let response = "Here is the documentation:\n```json\n{\"summary\": \"List users\", \"description\": \"Returns all users\"}\n```\nLet me know if you need more.";

        let operation = parse_operation(response);

        assert_eq!(operation.summary, "List users");
        assert_eq!(operation.description, "Returns all users");
    }

    #[test]
    fn test_parse_operation_from_bare_json() {
        let response = r#"{"summary": "Create order", "description": "Creates an order", "parameters": [{"name": "body", "in": "body", "required": true}]}"#;

        let operation = parse_operation(response);

        assert_eq!(operation.summary, "Create order");
        assert_eq!(operation.parameters.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_operation_with_surrounding_prose() {
        let response = "Sure! {\"summary\": \"Delete item\", \"description\": \"Removes it\"} Hope that helps.";

        let operation = parse_operation(response);

        assert_eq!(operation.summary, "Delete item");
    }

    #[test]
    fn test_parse_operation_defaults_empty_fields() {
        let operation = parse_operation("{}");

        assert_eq!(operation.summary, "API endpoint");
        assert_eq!(operation.description, "No description available");
    }

    #[test]
    fn test_parse_operation_garbage_falls_back() {
        let operation = parse_operation("I could not analyze this route.");

        assert_eq!(operation.summary, "API endpoint");
        assert_eq!(operation.description, "Failed to parse model response");
        assert!(operation.parameters.is_none());
    }

    #[test]
    fn test_stub_operation_names_the_route() {
        let operation = stub_operation("GET /users");

        assert_eq!(operation.summary, "GET /users endpoint");
        assert!(operation.parameters.is_none());
    }
}
