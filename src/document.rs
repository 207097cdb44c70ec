//! OpenAPI 3.0 data model and document assembly.
//!
//! The model is intentionally lenient on the leaves: operation descriptions
//! come back from a language model, so schema values and examples are kept
//! as raw JSON values and unknown fields are ignored during deserialization.

use crate::extractor::HttpMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OpenAPI version tag written into every document.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Default info block values, each applied independently when no override is
/// given.
pub const DEFAULT_TITLE: &str = "File-routed API";
pub const DEFAULT_DOC_VERSION: &str = "1.0.0";
pub const DEFAULT_DESCRIPTION: &str =
    "Automatically generated API documentation for file-based route handlers";

/// OpenAPI Info object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Location of a parameter within the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Body,
    Cookie,
}

/// OpenAPI Parameter object, as described by the enrichment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<serde_json::Value>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

/// A single API operation: the enrichment result for one (route file,
/// method) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(
        default,
        rename = "requestBody",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<RequestBody>,
}

/// All operations of one API path, one optional slot per HTTP method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
}

impl PathItem {
    /// Fills the slot for `method`. The merge is additive: every other
    /// method's slot is left untouched.
    pub fn insert(&mut self, method: HttpMethod, operation: Operation) {
        match method {
            HttpMethod::Get => self.get = Some(operation),
            HttpMethod::Post => self.post = Some(operation),
            HttpMethod::Put => self.put = Some(operation),
            HttpMethod::Delete => self.delete = Some(operation),
            HttpMethod::Patch => self.patch = Some(operation),
            HttpMethod::Options => self.options = Some(operation),
            HttpMethod::Head => self.head = Some(operation),
        }
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
        }
    }

    /// Methods with an operation present, in canonical order.
    pub fn methods(&self) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .iter()
            .filter(|method| self.operation(**method).is_some())
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.methods().is_empty()
    }
}

/// Accumulated result map of a run: API path template to its path item.
///
/// A `BTreeMap` keeps serialization order stable across runs.
pub type Paths = BTreeMap<String, PathItem>;

/// Complete OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: Paths,
}

/// Optional overrides for the document info block.
#[derive(Debug, Clone, Default)]
pub struct InfoOverrides {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Assembles the final document from the accumulated path map.
///
/// Pure and synchronous: each info field independently falls back to its
/// default, `servers` defaults to an empty list and `paths` is passed
/// through unmodified.
pub fn assemble(paths: Paths, info: InfoOverrides, servers: Option<Vec<Server>>) -> OpenApiDocument {
    OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: info.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            version: info
                .version
                .unwrap_or_else(|| DEFAULT_DOC_VERSION.to_string()),
            description: Some(
                info.description
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            ),
        },
        servers: servers.unwrap_or_default(),
        paths,
    }
}
