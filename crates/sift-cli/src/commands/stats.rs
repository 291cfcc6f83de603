//! Stats command implementation.

use crate::app::App;
use crate::error::Result;
use crate::output::{Formatter, StatsReport};
use sift_domain::traits::EntryStore;

/// Recent metric observations shown.
const RECENT_METRICS: usize = 10;

/// Gather store-wide statistics.
pub fn collect_stats(app: &App) -> Result<StatsReport> {
    let store = app.store();
    let classifier = app.pipeline().classifier();
    Ok(StatsReport {
        entries: store.count()?,
        logs: store.log_stats()?,
        metrics: store.recent_metrics(None, RECENT_METRICS)?,
        matcher: classifier.matcher().name(),
        degraded: classifier.is_degraded(),
        fingerprint: classifier.fingerprinter().algorithm().as_str(),
    })
}

/// Execute the stats command.
pub async fn execute_stats(app: &App, formatter: &Formatter) -> Result<()> {
    let stats = collect_stats(app)?;
    println!("{}", formatter.format_stats(&stats)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiftConfig;

    #[test]
    fn test_collect_stats() {
        let app = App::in_memory(&SiftConfig::default()).unwrap();
        app.pipeline().ingest("hello world", "text").unwrap();
        app.pipeline().ingest("hello world", "text").unwrap();
        app.pipeline().ingest("", "text").unwrap();

        let stats = collect_stats(&app).unwrap();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.logs.total, 2);
        assert_eq!(stats.logs.redundant, 1);
        assert!((stats.logs.redundancy_rate() - 0.5).abs() < 1e-9);
        assert_eq!(stats.matcher, "edit_distance");
        assert_eq!(stats.fingerprint, "sha256");
        assert!(!stats.degraded);
    }
}
