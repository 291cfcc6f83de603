//! Demo command implementation.

use crate::app::App;
use crate::error::Result;
use crate::output::Formatter;
use sift_engine::BatchItem;
use std::sync::Arc;

/// Sample data set: text variants, one exact duplicate and typed values.
pub fn sample_items() -> Vec<BatchItem> {
    vec![
        BatchItem::new("Sample text data 1", "text"),
        BatchItem::new("Sample text data 2", "text"),
        BatchItem::new("Sample text data 1", "text"),
        BatchItem::new("12345", "number"),
        BatchItem::new("2023-01-01", "date"),
        BatchItem::new("true", "boolean"),
        BatchItem::new("Sample text data 3", "text"),
    ]
}

/// Execute the demo command.
pub async fn execute_demo(app: &App, formatter: &Formatter) -> Result<()> {
    let pipeline = Arc::clone(app.pipeline());
    let items = sample_items();

    let outcomes = tokio::task::spawn_blocking(move || {
        items
            .into_iter()
            .map(|item| {
                let outcome = pipeline.ingest(&item.content, &item.data_type);
                (item, outcome)
            })
            .collect::<Vec<_>>()
    })
    .await?;

    for (item, outcome) in outcomes {
        println!("{}", formatter.format_outcome(&item.content, &outcome?)?);
    }

    let metrics = app.pipeline().classifier().metrics();
    println!();
    println!("{}", formatter.info(&metrics.summary().replace('\n', "\n  ")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, SiftConfig};
    use sift_domain::traits::EntryStore;

    #[tokio::test]
    async fn test_demo_classifies_sample_data() {
        let app = App::in_memory(&SiftConfig::default()).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_demo(&app, &formatter).await.unwrap();

        // "Sample text data 2" and "3" are one edit from "Sample text data 1"
        let metrics = app.pipeline().classifier().metrics();
        assert_eq!(metrics.unique, 4);
        assert_eq!(metrics.exact_duplicates, 1);
        assert_eq!(metrics.near_duplicates, 2);
        assert_eq!(app.store().count().unwrap(), 4);
    }
}
