use crate::document::{assemble, InfoOverrides, Server};
use crate::error::{Error, Result as ConfigResult};
use crate::filter::filter_routes;
use crate::html::render_viewer_page;
use crate::locator::RouteLocator;
use crate::processor::RouteProcessor;
use crate::provider::{create_provider, ProviderKind};
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::Result;
use clap::Parser;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

/// Generate OpenAPI documents from file-based HTTP route handlers using
/// LLM-generated operation descriptions
#[derive(Parser, Debug)]
#[command(name = "openapi-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory containing route handler files
    #[arg(long = "dir", value_name = "DIRECTORY", default_value = "./app/api")]
    pub dir: PathBuf,

    /// Output file base path; the format extension is appended
    #[arg(
        short = 'o',
        long = "output-file",
        value_name = "FILE",
        default_value = "openapi"
    )]
    pub output_file: PathBuf,

    /// Output format (yaml, json or html)
    #[arg(short = 'f', long = "format", value_name = "FORMAT", default_value = "yaml")]
    pub format: String,

    /// Comma-separated list of route patterns to process (e.g. /users,/products/*)
    #[arg(long = "routes", value_name = "ROUTES", value_delimiter = ',')]
    pub routes: Vec<String>,

    /// LLM provider (anthropic or openai)
    #[arg(
        short = 'p',
        long = "provider",
        value_name = "PROVIDER",
        env = "LLM_PROVIDER",
        default_value = "anthropic"
    )]
    pub provider: String,

    /// LLM model; defaults to the provider's default model
    #[arg(short = 'm', long = "model", value_name = "MODEL", env = "LLM_MODEL")]
    pub model: Option<String>,

    /// LLM provider API key; falls back to the provider's environment variable
    #[arg(short = 'k', long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Title for the OpenAPI info block
    #[arg(short = 't', long = "title", value_name = "TITLE")]
    pub title: Option<String>,

    /// Description for the OpenAPI info block
    #[arg(short = 'd', long = "description", value_name = "DESCRIPTION")]
    pub description: Option<String>,

    /// Version for the OpenAPI info block
    #[arg(long = "doc-version", value_name = "VERSION")]
    pub doc_version: Option<String>,

    /// Comma-separated server list with optional descriptions
    /// (url|description,url2|description2)
    #[arg(
        long = "servers",
        value_name = "SERVERS",
        default_value = "http://localhost:3000/api|Development server"
    )]
    pub servers: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output formats for the generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(Error::Config(format!(
                "Invalid format \"{}\". Available formats: yaml | json | html",
                s
            ))),
        }
    }
}

/// Fully validated run options.
#[derive(Debug)]
pub struct GenerateOptions {
    pub dir: PathBuf,
    pub output_file: PathBuf,
    pub format: OutputFormat,
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: String,
    pub routes: Vec<String>,
    pub info: InfoOverrides,
    pub servers: Vec<Server>,
}

/// Validates CLI arguments into run options.
///
/// This is the fail-fast gate: provider, API key and output format are
/// checked here, before any file discovery or provider construction.
pub fn validate_args(args: &CliArgs) -> ConfigResult<GenerateOptions> {
    let provider: ProviderKind = args.provider.parse()?;
    let format: OutputFormat = args.format.parse()?;

    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var(provider.api_key_env()).ok())
        .unwrap_or_default();
    if api_key.trim().is_empty() {
        return Err(Error::Config(format!(
            "API key is required. Set the {} environment variable or use the --api-key option.",
            provider.api_key_env()
        )));
    }

    let model = args
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| provider.default_model().to_string());

    let routes: Vec<String> = args
        .routes
        .iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    let servers = parse_servers(&args.servers)?;

    Ok(GenerateOptions {
        dir: args.dir.clone(),
        output_file: args.output_file.clone(),
        format,
        provider,
        model,
        api_key,
        routes,
        info: InfoOverrides {
            title: args.title.clone(),
            version: args.doc_version.clone(),
            description: args.description.clone(),
        },
        servers,
    })
}

/// Parses a `url|description,url2|description2` server list.
pub fn parse_servers(value: &str) -> ConfigResult<Vec<Server>> {
    let mut servers = Vec::new();

    for entry in value.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let mut parts = entry.splitn(2, '|');
        let url = parts.next().unwrap_or_default().trim();
        if url.is_empty() {
            continue;
        }

        let description = parts
            .next()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        servers.push(Server {
            url: url.to_string(),
            description,
        });
    }

    if servers.is_empty() {
        return Err(Error::Config(
            "No valid servers provided. Expected format: \
             --servers \"https://api.example.com|Production,https://staging.example.com|Staging\""
                .to_string(),
        ));
    }

    Ok(servers)
}

/// Output path: base path with the format extension appended.
pub fn output_path_for(base: &Path, format: OutputFormat) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Run the main workflow
pub async fn run(args: CliArgs) -> Result<()> {
    // Fail-fast validation before any file I/O or provider construction
    let options = validate_args(&args)?;

    info!("Generating OpenAPI document...");
    info!("  provider: {}", options.provider);
    info!("  model: {}", options.model);
    info!("  format: {}", options.format);

    // Step 1: locate route files
    let locator = RouteLocator::new(options.dir.clone());
    let scan_result = locator.scan()?;

    if scan_result.route_files.is_empty() {
        warn!(
            "No route files found in directory \"{}\"",
            options.dir.display()
        );
        return Ok(());
    }
    debug!("Found {} route file(s)", scan_result.route_files.len());

    // Step 2: apply the route filter
    let filtered = filter_routes(&scan_result.route_files, &options.routes);
    if filtered.is_empty() {
        error!(
            "No route files match the requested routes {:?}",
            options.routes
        );
        return Ok(());
    }
    info!("Routes found: {}", filtered.len());

    // Step 3: process all routes through the enrichment provider
    let provider = create_provider(
        options.provider,
        options.api_key.clone(),
        options.model.clone(),
    );
    let processor = RouteProcessor::new();

    let started = Instant::now();
    let outcome = processor
        .process(&options.dir, &filtered, provider.as_ref())
        .await;
    let elapsed = started.elapsed();

    if outcome.paths.is_empty() {
        if outcome.failed > 0 {
            error!(
                "Failed to generate documentation for all {} route method(s). No output written.",
                outcome.failed
            );
        } else {
            warn!("No HTTP methods found in any route file. No output written.");
        }
        return Ok(());
    }

    info!("Generation completed ({:.2}s)", elapsed.as_secs_f64());
    info!("Routes processed:");
    for (path, item) in &outcome.paths {
        let methods: Vec<&str> = item.methods().iter().map(|m| m.as_str()).collect();
        info!("  {} [{}]", path, methods.join(", "));
    }

    // Step 4: assemble the document
    let document = assemble(
        outcome.paths,
        options.info.clone(),
        Some(options.servers.clone()),
    );

    // Step 5: serialize to the requested format and write
    let content = match options.format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Html => render_viewer_page(&document)?,
    };

    let output_path = output_path_for(&options.output_file, options.format);
    write_to_file(&content, &output_path)?;

    if outcome.failed > 0 {
        warn!(
            "{} of {} route method(s) failed; the generated document may be incomplete",
            outcome.failed,
            outcome.failed + outcome.succeeded
        );
    }
    info!("OpenAPI document generated at {}", output_path.display());

    Ok(())
}
