//! OpenAI chat-completions backend.

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

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Enrichment backend for the OpenAI chat completions API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    top_p: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl OpenAiProvider {
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
        let request = ChatRequest {
            model: &self.model,
            max_tokens: MAX_COMPLETION_TOKENS,
            top_p: COMPLETION_TOP_P,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("OpenAI API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, body);
        }

        let response: ChatResponse = response
            .json()
            .await
            .context("Failed to decode OpenAI API response")?;

        let text = response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();

        Ok(parse_operation(text))
    }
}

impl EnrichmentProvider for OpenAiProvider {
    fn generate<'a>(
        &'a self,
        file_path: &'a Path,
        method: HttpMethod,
        route: &'a str,
    ) -> BoxFuture<'a, Result<Operation>> {
        Box::pin(self.generate_operation(file_path, method, route))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_operation_without_implementation() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file_path = temp_dir.path().join("route.ts");
        std::fs::write(&file_path, "export let DELETE = adminOnly(handler)\n").unwrap();

        let provider = OpenAiProvider::new("key".to_string(), "model".to_string());
        let operation = provider
            .generate(&file_path, HttpMethod::Delete, "DELETE /users/{id}")
            .await
            .unwrap();

        assert_eq!(operation.summary, "DELETE /users/{id} endpoint");
    }
}
