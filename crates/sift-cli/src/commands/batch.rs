//! Batch command implementation.

use crate::app::{App, SiftPipeline};
use crate::cli::BatchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use sift_engine::{BatchItem, BatchReport};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Execute the batch command.
pub async fn execute_batch(args: BatchArgs, app: &App, formatter: &Formatter) -> Result<()> {
    if args.jobs == 0 {
        return Err(CliError::InvalidInput("--jobs must be at least 1".to_string()));
    }

    let json_data = fs::read_to_string(&args.file)?;
    let items: Vec<BatchItem> = serde_json::from_str(&json_data)?;
    if items.is_empty() {
        return Err(CliError::InvalidInput("No items provided".to_string()));
    }

    let items = Arc::new(items);
    let report = run_batch(Arc::clone(app.pipeline()), Arc::clone(&items), args.jobs).await?;

    let summary = report.summary();
    if let Err(e) = summary.record_metrics(app.store()) {
        tracing::warn!(error = %e, "Failed to record batch metrics");
    }

    println!("{}", formatter.format_batch(&items, &report)?);
    Ok(())
}

/// Classify all items with `jobs` blocking workers.
///
/// Workers pull the next unclaimed index, so with more than one job the
/// decisions depend on interleaving; the report is always in input order.
pub async fn run_batch(
    pipeline: Arc<SiftPipeline>,
    items: Arc<Vec<BatchItem>>,
    jobs: usize,
) -> Result<BatchReport> {
    if jobs <= 1 {
        return Ok(tokio::task::spawn_blocking(move || pipeline.process_batch(&items)).await?);
    }

    tracing::info!(items = items.len(), jobs, "Processing batch concurrently");
    let next = Arc::new(AtomicUsize::new(0));
    let workers: Vec<_> = (0..jobs.min(items.len()))
        .map(|_| {
            let (pipeline, items, next) = (Arc::clone(&pipeline), Arc::clone(&items), Arc::clone(&next));
            tokio::task::spawn_blocking(move || {
                let mut results = Vec::new();
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(item) = items.get(index) else {
                        break;
                    };
                    results.push(pipeline.ingest_with_retry(index, item));
                }
                results
            })
        })
        .collect();

    let mut results = Vec::with_capacity(items.len());
    for worker in workers {
        results.extend(worker.await?);
    }
    Ok(BatchReport::from_results(results))
}
