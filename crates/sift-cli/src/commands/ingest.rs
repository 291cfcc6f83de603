//! Ingest command implementation.

use crate::app::App;
use crate::cli::IngestArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use sift_engine::IngestOutcome;
use std::sync::Arc;

/// Execute the ingest command.
///
/// A rejected item is reported as an error so the process exits non-zero.
pub async fn execute_ingest(args: IngestArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let pipeline = Arc::clone(app.pipeline());
    let (content, data_type) = (args.content.clone(), args.data_type.clone());

    let outcome =
        tokio::task::spawn_blocking(move || pipeline.ingest(&content, &data_type)).await??;

    if let IngestOutcome::Rejected { reason } = outcome {
        return Err(CliError::Rejected(reason));
    }

    println!("{}", formatter.format_outcome(&args.content, &outcome)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, SiftConfig};
    use sift_domain::traits::EntryStore;

    #[tokio::test]
    async fn test_ingest_stores_entry() {
        let app = App::in_memory(&SiftConfig::default()).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = IngestArgs {
            content: "Sample text data 1".into(),
            data_type: "text".into(),
        };
        execute_ingest(args, &app, &formatter).await.unwrap();
        assert_eq!(app.store().count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ingest_rejection_is_error() {
        let app = App::in_memory(&SiftConfig::default()).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let args = IngestArgs {
            content: "maybe".into(),
            data_type: "boolean".into(),
        };
        let result = execute_ingest(args, &app, &formatter).await;
        assert!(matches!(result, Err(CliError::Rejected(_))));
        assert_eq!(app.store().count().unwrap(), 0);
    }
}
