//! Concurrency-bounded route processing.
//!
//! This is the heart of the pipeline: every filtered route file is read
//! once, its HTTP methods are extracted, and one enrichment call per method
//! fans out to the provider. File-level parallelism is capped; method-level
//! fan-out within a file is not.

use crate::document::{Operation, Paths};
use crate::extractor::{extract_methods, HttpMethod};
use crate::locator::to_api_path;
use crate::provider::EnrichmentProvider;
use futures::future;
use futures::stream::{self, StreamExt};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// Default number of route files processed simultaneously.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Route processor owning the concurrency ceiling.
///
/// The ceiling is instance state, injectable for tests; nothing here is
/// process-wide. Scheduling is a sliding window: up to `concurrency` files
/// are in flight and a slot refills the moment any file completes, with no
/// barrier between groups of files. Final results do not depend on
/// completion order, only log interleaving does.
pub struct RouteProcessor {
    concurrency: usize,
}

/// Result of one processing run.
pub struct ProcessOutcome {
    /// API path template to accumulated path item
    pub paths: Paths,
    /// Number of (file, method) pairs that produced an operation
    pub succeeded: usize,
    /// Number of (file, method) pairs that failed, plus unreadable files
    pub failed: usize,
}

struct FileOutcome {
    api_path: String,
    operations: Vec<(HttpMethod, Operation)>,
    failed: usize,
}

impl RouteProcessor {
    pub fn new() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Processes the filtered route files against the enrichment provider
    /// and returns the accumulated path map.
    ///
    /// Failures never abort the run: a provider error costs exactly the one
    /// (file, method) pair that failed, an unreadable file costs that file,
    /// and a file without methods is skipped with a warning. An empty result
    /// map is a legitimate terminal state for the caller to handle.
    pub async fn process(
        &self,
        root: &Path,
        route_files: &[PathBuf],
        provider: &dyn EnrichmentProvider,
    ) -> ProcessOutcome {
        let mut outcomes = stream::iter(
            route_files
                .iter()
                .enumerate()
                .map(|(index, route_file)| process_file(root, route_file, index, provider)),
        )
        .buffer_unordered(self.concurrency);

        // Merging happens here on the driver side of the fan-out, so the map
        // needs no lock; inserts are keyed by ApiPath and additive.
        let mut paths = Paths::new();
        let mut succeeded = 0;
        let mut failed = 0;

        while let Some(outcome) = outcomes.next().await {
            let Some(outcome) = outcome else {
                continue;
            };

            succeeded += outcome.operations.len();
            failed += outcome.failed;

            if !outcome.operations.is_empty() {
                let item = paths.entry(outcome.api_path).or_default();
                for (method, operation) in outcome.operations {
                    item.insert(method, operation);
                }
            }
        }

        ProcessOutcome {
            paths,
            succeeded,
            failed,
        }
    }
}

impl Default for RouteProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Processes one route file: read, extract methods, fan out one provider
/// call per method. Returns `None` when the file contributes nothing.
async fn process_file(
    root: &Path,
    route_file: &Path,
    index: usize,
    provider: &dyn EnrichmentProvider,
) -> Option<FileOutcome> {
    let full_path = root.join(route_file);
    let api_path = to_api_path(route_file);

    let file_content = match tokio::fs::read_to_string(&full_path).await {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read route file {}: {}", full_path.display(), e);
            return Some(FileOutcome {
                api_path,
                operations: Vec::new(),
                failed: 1,
            });
        }
    };

    let methods = extract_methods(&file_content);
    if methods.is_empty() {
        warn!("No HTTP methods found for {}", api_path);
        return None;
    }

    let method_names: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
    info!(
        "Processing file {}: {} [{}]",
        index + 1,
        api_path,
        method_names.join(", ")
    );

    // All methods of a file run fully in parallel; the concurrency ceiling
    // only bounds the number of files in flight
    let calls = methods.iter().map(|&method| {
        let route = format!("{} {}", method.as_upper_str(), api_path);
        let full_path = &full_path;
        async move {
            match provider.generate(full_path, method, &route).await {
                Ok(operation) => Ok((method, operation)),
                Err(e) => {
                    error!("Error processing \"{}\": {}", route, e);
                    Err(())
                }
            }
        }
    });

    let results = future::join_all(calls).await;

    let mut operations = Vec::new();
    let mut failed = 0;
    for result in results {
        match result {
            Ok(pair) => operations.push(pair),
            Err(()) => failed += 1,
        }
    }

    Some(FileOutcome {
        api_path,
        operations,
        failed,
    })
}
