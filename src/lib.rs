//! OpenAPI generator for file-based HTTP route handlers.
//!
//! This library scans a directory of route handler files (files named
//! `route.<ext>`, where each file's directory position determines its URL
//! path), extracts the HTTP methods each file exports, asks a pluggable LLM
//! provider to describe every (file, method) pair and assembles the results
//! into an OpenAPI 3.0 document serialized as YAML, JSON or a self-contained
//! HTML viewer page.
//!
//! # Architecture
//!
//! The pipeline runs through these modules in order:
//!
//! 1. [`locator`] - Discovers route files and derives API path templates
//! 2. [`filter`] - Narrows the file set to user-supplied route patterns
//! 3. [`extractor`] - Extracts exported HTTP methods from file text
//! 4. [`processor`] - Fans out enrichment calls under a concurrency cap
//! 5. [`provider`] - The pluggable enrichment backends (Anthropic, OpenAI)
//! 6. [`document`] - The OpenAPI data model and document assembly
//! 7. [`serializer`] / [`html`] - Output formatting and file writing
//!
//! Failures during the fan-out never abort a run: a failed enrichment call
//! costs exactly the one (file, method) pair that failed, and the run ends
//! with a summary of how many operations succeeded versus failed.
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_routes::document::{assemble, InfoOverrides};
//! use openapi_from_routes::filter::filter_routes;
//! use openapi_from_routes::locator::RouteLocator;
//! use openapi_from_routes::processor::RouteProcessor;
//! use openapi_from_routes::provider::{create_provider, ProviderKind};
//! use openapi_from_routes::serializer::serialize_yaml;
//! use std::path::PathBuf;
//!
//! # async fn generate() -> anyhow::Result<()> {
//! let root = PathBuf::from("./app/api");
//!
//! // Discover and filter route files
//! let scan = RouteLocator::new(root.clone()).scan()?;
//! let files = filter_routes(&scan.route_files, &[]);
//!
//! // Enrich every (file, method) pair
//! let provider = create_provider(
//!     ProviderKind::Anthropic,
//!     "api-key".to_string(),
//!     "claude-3-5-sonnet-latest".to_string(),
//! );
//! let outcome = RouteProcessor::new()
//!     .process(&root, &files, provider.as_ref())
//!     .await;
//!
//! // Assemble and serialize
//! let document = assemble(outcome.paths, InfoOverrides::default(), None);
//! println!("{}", serialize_yaml(&document)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides the
//! complete CLI application.

pub mod cli;
pub mod document;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod html;
pub mod locator;
pub mod processor;
pub mod prompt;
pub mod provider;
pub mod serializer;
