use anyhow::Result;
use futures::future::BoxFuture;
use openapi_from_routes::document::{assemble, InfoOverrides, Operation, Server};
use openapi_from_routes::extractor::HttpMethod;
use openapi_from_routes::filter::filter_routes;
use openapi_from_routes::locator::RouteLocator;
use openapi_from_routes::processor::RouteProcessor;
use openapi_from_routes::provider::EnrichmentProvider;
use openapi_from_routes::serializer::{serialize_json, serialize_yaml};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Helper function to create a temporary routes directory
fn create_test_routes(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

const GET_ROUTE: &str = "export async function GET(request) {\n    return list()\n}\n";
const GET_POST_ROUTE: &str = "export async function GET(request) {\n    return list()\n}\n\nexport async function POST(request) {\n    const body = await request.json()\n    return create(body)\n}\n";

/// Stub provider that answers instantly, failing for the listed routes.
struct StubProvider {
    failing_routes: Vec<String>,
}

impl StubProvider {
    fn reliable() -> Self {
        Self {
            failing_routes: Vec::new(),
        }
    }

    fn failing_on(routes: &[&str]) -> Self {
        Self {
            failing_routes: routes.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl EnrichmentProvider for StubProvider {
    fn generate<'a>(
        &'a self,
        _file_path: &'a Path,
        _method: HttpMethod,
        route: &'a str,
    ) -> BoxFuture<'a, Result<Operation>> {
        Box::pin(async move {
            if self.failing_routes.iter().any(|r| r == route) {
                anyhow::bail!("stub failure for {}", route);
            }
            Ok(Operation {
                summary: format!("{} summary", route),
                description: format!("Description for {}", route),
                parameters: None,
                request_body: None,
            })
        })
    }
}

/// Stub provider instrumented with an in-flight high-water mark.
struct CountingProvider {
    active: AtomicUsize,
    max_active: AtomicUsize,
    delay: Duration,
}

impl CountingProvider {
    fn with_delay(delay: Duration) -> Self {
        Self {
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            delay,
        }
    }

    fn max_overlap(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl EnrichmentProvider for CountingProvider {
    fn generate<'a>(
        &'a self,
        _file_path: &'a Path,
        _method: HttpMethod,
        route: &'a str,
    ) -> BoxFuture<'a, Result<Operation>> {
        Box::pin(async move {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Operation {
                summary: route.to_string(),
                description: String::new(),
                parameters: None,
                request_body: None,
            })
        })
    }
}

#[tokio::test]
async fn test_end_to_end_yaml_generation() {
    let temp_dir = create_test_routes(vec![
        ("route.ts", GET_ROUTE),
        ("users/route.ts", GET_POST_ROUTE),
        ("products/[id]/route.ts", GET_ROUTE),
    ]);
    let root = temp_dir.path();

    // Step 1: locate route files
    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    assert_eq!(scan.route_files.len(), 3);

    // Step 2: no filter patterns, everything passes
    let files = filter_routes(&scan.route_files, &[]);
    assert_eq!(files.len(), 3);

    // Step 3: process against the stub provider
    let outcome = RouteProcessor::new()
        .process(root, &files, &StubProvider::reliable())
        .await;

    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.succeeded, 4);
    assert_eq!(outcome.paths.len(), 3);
    assert!(outcome.paths.contains_key("/"));
    assert!(outcome.paths.contains_key("/users"));
    assert!(outcome.paths.contains_key("/products/{id}"));

    // Step 4: assemble and serialize
    let document = assemble(
        outcome.paths,
        InfoOverrides {
            title: Some("Store API".to_string()),
            version: None,
            description: None,
        },
        Some(vec![Server {
            url: "http://localhost:3000/api".to_string(),
            description: Some("Development server".to_string()),
        }]),
    );

    let yaml = serialize_yaml(&document).unwrap();
    assert!(yaml.contains("openapi: 3.0.0"));
    assert!(yaml.contains("title: Store API"));
    assert!(yaml.contains("/users:"));
    assert!(yaml.contains("/products/{id}:"));
    assert!(yaml.contains("post:"));
}

#[tokio::test]
async fn test_concurrency_cap_never_exceeded() {
    // 12 single-method files with C=5: provider-call overlap equals
    // file-level overlap, so the high-water mark must stay at or below 5
    let routes: Vec<(String, &str)> = (0..12)
        .map(|i| (format!("resource{:02}/route.ts", i), GET_ROUTE))
        .collect();
    let temp_dir = create_test_routes(
        routes
            .iter()
            .map(|(path, content)| (path.as_str(), *content))
            .collect(),
    );
    let root = temp_dir.path();

    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    assert_eq!(scan.route_files.len(), 12);

    let provider = CountingProvider::with_delay(Duration::from_millis(40));
    let outcome = RouteProcessor::with_concurrency(5)
        .process(root, &scan.route_files, &provider)
        .await;

    assert!(
        provider.max_overlap() <= 5,
        "max overlap {} exceeded the concurrency cap",
        provider.max_overlap()
    );
    assert_eq!(outcome.succeeded, 12);
    assert_eq!(outcome.paths.len(), 12);
}

#[tokio::test]
async fn test_methods_within_a_file_run_in_parallel() {
    // One file exporting four methods with C=1: the cap bounds files, not
    // methods, so all four provider calls overlap
    let source = "export async function GET(req) {\n    return a()\n}\n\
                  export async function POST(req) {\n    return b()\n}\n\
                  export async function PUT(req) {\n    return c()\n}\n\
                  export async function DELETE(req) {\n    return d()\n}\n";
    let temp_dir = create_test_routes(vec![("items/route.ts", source)]);
    let root = temp_dir.path();

    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    let provider = CountingProvider::with_delay(Duration::from_millis(100));
    let outcome = RouteProcessor::with_concurrency(1)
        .process(root, &scan.route_files, &provider)
        .await;

    assert_eq!(outcome.succeeded, 4);
    assert!(
        provider.max_overlap() >= 2,
        "expected method-level fan-out, max overlap was {}",
        provider.max_overlap()
    );
    assert_eq!(outcome.paths["/items"].methods().len(), 4);
}

#[tokio::test]
async fn test_partial_failure_isolation() {
    // 2 files x 2 methods with exactly one induced failure: 3 of 4
    // operations survive, attributed to the right paths and methods
    let temp_dir = create_test_routes(vec![
        ("users/route.ts", GET_POST_ROUTE),
        ("orders/route.ts", GET_POST_ROUTE),
    ]);
    let root = temp_dir.path();

    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    let provider = StubProvider::failing_on(&["POST /orders"]);
    let outcome = RouteProcessor::new()
        .process(root, &scan.route_files, &provider)
        .await;

    assert_eq!(outcome.succeeded, 3);
    assert_eq!(outcome.failed, 1);

    let users = &outcome.paths["/users"];
    assert!(users.get.is_some());
    assert!(users.post.is_some());

    let orders = &outcome.paths["/orders"];
    assert!(orders.get.is_some());
    assert!(orders.post.is_none());

    assert_eq!(
        orders.get.as_ref().map(|op| op.summary.as_str()),
        Some("GET /orders summary")
    );
}

#[tokio::test]
async fn test_route_filter_narrows_the_run() {
    let temp_dir = create_test_routes(vec![
        ("users/route.ts", GET_ROUTE),
        ("products/route.ts", GET_ROUTE),
        ("products/[id]/route.ts", GET_ROUTE),
        ("orders/route.ts", GET_ROUTE),
    ]);
    let root = temp_dir.path();

    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    let patterns = vec!["/users".to_string(), "/products/*".to_string()];
    let files = filter_routes(&scan.route_files, &patterns);
    assert_eq!(files.len(), 3);

    let outcome = RouteProcessor::new()
        .process(root, &files, &StubProvider::reliable())
        .await;

    assert_eq!(outcome.paths.len(), 3);
    assert!(outcome.paths.contains_key("/users"));
    assert!(outcome.paths.contains_key("/products"));
    assert!(outcome.paths.contains_key("/products/{id}"));
    assert!(!outcome.paths.contains_key("/orders"));
}

#[tokio::test]
async fn test_filter_without_matches_is_a_distinct_terminal_state() {
    let temp_dir = create_test_routes(vec![("users/route.ts", GET_ROUTE)]);
    let root = temp_dir.path();

    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    assert!(!scan.route_files.is_empty(), "files were discovered");

    // Filtering removed everything: the caller distinguishes this from an
    // empty scan and ends the run without output
    let files = filter_routes(&scan.route_files, &["/payments".to_string()]);
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_json_output_shape() {
    let temp_dir = create_test_routes(vec![("users/[id]/route.ts", GET_POST_ROUTE)]);
    let root = temp_dir.path();

    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    let outcome = RouteProcessor::new()
        .process(root, &scan.route_files, &StubProvider::reliable())
        .await;

    let document = assemble(outcome.paths, InfoOverrides::default(), None);
    let json = serialize_json(&document).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["openapi"], "3.0.0");
    assert_eq!(
        parsed["paths"]["/users/{id}"]["get"]["summary"],
        "GET /users/{id} summary"
    );
    assert_eq!(
        parsed["paths"]["/users/{id}"]["post"]["summary"],
        "POST /users/{id} summary"
    );
    // Methods that were never discovered must not appear at all
    assert!(parsed["paths"]["/users/{id}"].get("delete").is_none());
}

#[tokio::test]
async fn test_method_less_files_contribute_nothing() {
    let temp_dir = create_test_routes(vec![
        ("helpers/route.ts", "export const runtime = 'edge'\n"),
        ("users/route.ts", GET_ROUTE),
    ]);
    let root = temp_dir.path();

    let scan = RouteLocator::new(root.to_path_buf()).scan().unwrap();
    let outcome = RouteProcessor::new()
        .process(root, &scan.route_files, &StubProvider::reliable())
        .await;

    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.paths.len(), 1);
    assert!(outcome.paths.contains_key("/users"));
}
