//! Anthropic messages-API backend.

use crate::document::Operation;
use crate::extractor::HttpMethod;
use crate::prompt::{build_prompt, extract_method_implementation};
use crate::provider::{
    parse_operation, stub_operation, EnrichmentProvider, COMPLETION_TOP_P, MAX_COMPLETION_TOKENS,
};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Enrichment backend for the Anthropic messages API.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    top_p: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    async fn generate_operation(
        &self,
        file_path: &Path,
        method: HttpMethod,
        route: &str,
    ) -> Result<Operation> {
        let file_content = tokio::fs::read_to_string(file_path)
            .await
            .with_context(|| format!("Failed to read route file {}", file_path.display()))?;

        let Some(implementation) = extract_method_implementation(&file_content, method) else {
            debug!(
                "No {} implementation found in {}",
                method.as_upper_str(),
                file_path.display()
            );
            return Ok(stub_operation(route));
        };

        let prompt = build_prompt(route, &implementation);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_COMPLETION_TOKENS,
            top_p: COMPLETION_TOP_P,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .context("Anthropic API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({}): {}", status, body);
        }

        let response: MessagesResponse = response
            .json()
            .await
            .context("Failed to decode Anthropic API response")?;

        let text = response
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();

        Ok(parse_operation(text))
    }
}

impl EnrichmentProvider for AnthropicProvider {
    fn generate<'a>(
        &'a self,
        file_path: &'a Path,
        method: HttpMethod,
        route: &'a str,
    ) -> BoxFuture<'a, Result<Operation>> {
        Box::pin(self.generate_operation(file_path, method, route))
    }
}
