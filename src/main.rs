//! Command-line tool for generating OpenAPI documentation from file-based
//! HTTP route handlers.
//!
//! The tool scans a routes directory for `route.<ext>` files, extracts the
//! HTTP methods each file exports, asks an LLM provider to describe every
//! (file, method) pair and writes one OpenAPI 3.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-routes --dir ./app/api -o openapi -f yaml
//! ```
//!
//! # Examples
//!
//! Generate JSON documentation for a subset of routes:
//! ```bash
//! openapi-from-routes --dir ./app/api -f json --routes /users,/products/*
//! ```
//!
//! Generate a self-contained HTML viewer page:
//! ```bash
//! openapi-from-routes --dir ./app/api -f html -o docs/api
//! ```

mod cli;
mod document;
mod error;
mod extractor;
mod filter;
mod html;
mod locator;
mod processor;
mod prompt;
mod provider;
mod serializer;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Load env files from the working directory before any flag defaults are
    // resolved; missing files are fine
    for env_file in [".env", ".env.local", ".env.development", ".env.dev"] {
        let _ = dotenvy::from_filename(env_file);
    }

    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    cli::run(args).await
}
