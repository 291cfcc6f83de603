//! Rendering of decisions, entries and audit records as tables, JSON or
//! bare ids.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::{Color, Colorize};
use serde_json::{json, Value};
use sift_domain::{Decision, Entry, Metric, ProcessingLogRecord};
use sift_engine::{BatchItem, BatchReport, IngestOutcome};
use sift_store::LogStats;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest content shown in a table cell.
const CONTENT_WIDTH: usize = 40;

/// Store-wide figures shown by the stats command.
#[derive(Debug, Clone)]
pub struct StatsReport {
    /// Stored entries
    pub entries: usize,
    /// Audit trail aggregates
    pub logs: LogStats,
    /// Most recent metric observations
    pub metrics: Vec<Metric>,
    /// Active matcher name
    pub matcher: &'static str,
    /// Whether the matcher is the degraded fallback
    pub degraded: bool,
    /// Fingerprint algorithm name
    pub fingerprint: &'static str,
}

/// Renders command results in the configured [`OutputFormat`].
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the outcome of ingesting one item.
    pub fn format_outcome(&self, content: &str, outcome: &IngestOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome_json(content, outcome))?),
            OutputFormat::Quiet => Ok(match outcome.decision().and_then(Decision::entry) {
                Some(entry) => entry.id.to_string(),
                None => outcome.kind().to_string(),
            }),
            OutputFormat::Table => Ok(self.outcome_line(content, outcome)),
        }
    }

    fn outcome_line(&self, content: &str, outcome: &IngestOutcome) -> String {
        match outcome {
            IngestOutcome::Rejected { reason } => {
                self.error(&format!("Rejected '{}': {}", truncate(content), reason))
            }
            IngestOutcome::Classified(Decision::Unique(entry)) => self.success(&format!(
                "Stored '{}' ({}) as {}",
                truncate(content),
                entry.data_type,
                entry.id
            )),
            IngestOutcome::Classified(Decision::ExactDuplicate(entry)) => self.warning(&format!(
                "Exact duplicate of {}: '{}'",
                entry.id,
                truncate(&entry.content)
            )),
            IngestOutcome::Classified(Decision::NearDuplicate { entry, similarity }) => {
                self.warning(&format!(
                    "Near duplicate of {} (similarity {:.2}): '{}'",
                    entry.id,
                    similarity,
                    truncate(&entry.content)
                ))
            }
            IngestOutcome::Classified(Decision::RedundantNoEntry { fingerprint }) => {
                self.warning(&format!(
                    "Redundant '{}'; matching entry {} not readable",
                    truncate(content),
                    fingerprint.short()
                ))
            }
        }
    }

    /// Format a batch report.
    pub fn format_batch(&self, items: &[BatchItem], report: &BatchReport) -> Result<String> {
        let summary = report.summary();
        match self.format {
            OutputFormat::Json => {
                let results: Vec<Value> = report
                    .results
                    .iter()
                    .map(|r| {
                        let content = items.get(r.index).map(|i| i.content.as_str()).unwrap_or("");
                        let mut value = match &r.outcome {
                            Ok(outcome) => outcome_json(content, outcome),
                            Err(e) => json!({ "content": content, "outcome": "failed", "error": e.to_string() }),
                        };
                        value["index"] = json!(r.index);
                        value["attempts"] = json!(r.attempts);
                        value
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "results": results,
                    "summary": summary,
                    "redundancy_rate": summary.redundancy_rate(),
                    "avg_processing_time_ms": summary.avg_processing_time_ms(),
                }))?)
            }
            OutputFormat::Quiet => Ok(report
                .results
                .iter()
                .map(|r| match &r.outcome {
                    Ok(outcome) => outcome.kind(),
                    Err(_) => "failed",
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["#", "Content", "Type", "Outcome", "Attempts"]);
                for r in &report.results {
                    let (content, data_type) = items
                        .get(r.index)
                        .map(|i| (truncate(&i.content), i.data_type.clone()))
                        .unwrap_or_default();
                    let outcome = match &r.outcome {
                        Ok(outcome) => outcome.kind().to_string(),
                        Err(e) => format!("failed: {}", e),
                    };
                    builder.push_record([
                        r.index.to_string(),
                        content,
                        data_type,
                        outcome,
                        r.attempts.to_string(),
                    ]);
                }

                let lines = [
                    render(builder),
                    String::new(),
                    self.info(&format!(
                        "{} items: {} unique, {} redundant ({} exact, {} near), {} rejected, {} failed",
                        summary.total,
                        summary.unique,
                        summary.redundant(),
                        summary.exact_duplicates,
                        summary.near_duplicates,
                        summary.rejected,
                        summary.failed
                    )),
                    self.info(&format!(
                        "Redundancy rate {:.1}%, avg {:.2}ms per item",
                        summary.redundancy_rate() * 100.0,
                        summary.avg_processing_time_ms()
                    )),
                ];
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format stored entries.
    pub fn format_entries(&self, entries: &[Entry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = entries.iter().map(entry_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("No entries found.", Color::Yellow));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Content", "Type", "Fingerprint", "Similarity", "Created"]);
                for entry in entries {
                    builder.push_record([
                        entry.id.to_string(),
                        truncate(&entry.content),
                        entry.data_type.to_string(),
                        entry.fingerprint.short().to_string(),
                        format!("{:.2}", entry.similarity_score),
                        entry.created_at.to_string(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format audit records.
    pub fn format_logs(&self, records: &[ProcessingLogRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = records.iter().map(log_json).collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| if r.success { "ok" } else { "failed" })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if records.is_empty() {
                    return Ok(self.colorize("No audit records found.", Color::Yellow));
                }
                let mut builder = Builder::default();
                builder.push_record([
                    "Time", "Content", "Type", "Redundant", "Near", "Similarity", "ms", "Status",
                ]);
                for r in records {
                    let status = match (&r.error_message, r.success) {
                        (_, true) => "ok".to_string(),
                        (Some(message), false) => message.clone(),
                        (None, false) => "failed".to_string(),
                    };
                    builder.push_record([
                        r.processed_at.to_string(),
                        truncate(&r.content),
                        r.data_type.to_string(),
                        yes_no(r.is_redundant).to_string(),
                        yes_no(r.is_false_positive).to_string(),
                        format!("{:.2}", r.similarity_score),
                        r.processing_time_ms.to_string(),
                        status,
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format store statistics.
    pub fn format_stats(&self, stats: &StatsReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let metrics: Vec<Value> = stats.metrics.iter().map(metric_json).collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "entries": stats.entries,
                    "classifications": stats.logs.total,
                    "failed": stats.logs.failed,
                    "redundant": stats.logs.redundant,
                    "false_positives": stats.logs.false_positives,
                    "redundancy_rate": stats.logs.redundancy_rate(),
                    "avg_processing_time_ms": stats.logs.avg_processing_time_ms,
                    "matcher": stats.matcher,
                    "degraded": stats.degraded,
                    "fingerprint": stats.fingerprint,
                    "recent_metrics": metrics,
                }))?)
            }
            OutputFormat::Quiet => Ok(stats.entries.to_string()),
            OutputFormat::Table => {
                let mut lines = vec![
                    format!("Entries: {}", stats.entries),
                    format!(
                        "Classifications: {} ({} failed)",
                        stats.logs.total, stats.logs.failed
                    ),
                    format!(
                        "Redundant: {} ({} near-duplicate)",
                        stats.logs.redundant, stats.logs.false_positives
                    ),
                    format!("Redundancy rate: {:.1}%", stats.logs.redundancy_rate() * 100.0),
                    format!(
                        "Avg processing time: {:.2}ms",
                        stats.logs.avg_processing_time_ms
                    ),
                    format!("Matcher: {}", stats.matcher),
                    format!("Fingerprint: {}", stats.fingerprint),
                ];
                if stats.degraded {
                    lines.push(self.warning("Near-duplicate detection is degraded"));
                }
                if !stats.metrics.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["Metric", "Value", "Type", "Timestamp"]);
                    for m in &stats.metrics {
                        builder.push_record([
                            m.name.clone(),
                            format!("{:.4}", m.value),
                            m.data_type.map(|t| t.to_string()).unwrap_or_default(),
                            m.timestamp.to_string(),
                        ]);
                    }
                    lines.push(String::new());
                    lines.push(render(builder));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), Color::Green)
    }

    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), Color::Red)
    }

    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), Color::Blue)
    }

    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), Color::Yellow)
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn truncate(content: &str) -> String {
    if content.chars().count() <= CONTENT_WIDTH {
        return content.to_string();
    }
    let head: String = content.chars().take(CONTENT_WIDTH - 1).collect();
    format!("{}…", head)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn outcome_json(content: &str, outcome: &IngestOutcome) -> Value {
    let mut value = json!({
        "content": content,
        "outcome": outcome.kind(),
    });
    match outcome {
        IngestOutcome::Rejected { reason } => value["reason"] = json!(reason),
        IngestOutcome::Classified(decision) => {
            value["similarity"] = json!(decision.similarity_score());
            if let Some(entry) = decision.entry() {
                value["entry"] = entry_json(entry);
            }
            if let Decision::RedundantNoEntry { fingerprint } = decision {
                value["fingerprint"] = json!(fingerprint.as_str());
            }
        }
    }
    value
}

fn entry_json(entry: &Entry) -> Value {
    json!({
        "id": entry.id.to_string(),
        "content": entry.content,
        "data_type": entry.data_type.as_str(),
        "fingerprint": entry.fingerprint.as_str(),
        "similarity_score": entry.similarity_score,
        "created_at": entry.created_at,
        "updated_at": entry.updated_at,
    })
}

fn log_json(record: &ProcessingLogRecord) -> Value {
    json!({
        "operation_type": record.operation_type.as_str(),
        "content": record.content,
        "data_type": record.data_type.as_str(),
        "fingerprint": record.fingerprint,
        "similarity_score": record.similarity_score,
        "is_redundant": record.is_redundant,
        "is_false_positive": record.is_false_positive,
        "processing_time_ms": record.processing_time_ms,
        "success": record.success,
        "error_message": record.error_message,
        "processed_at": record.processed_at,
    })
}

fn metric_json(metric: &Metric) -> Value {
    json!({
        "name": metric.name,
        "value": metric.value,
        "timestamp": metric.timestamp,
        "data_type": metric.data_type.map(|t| t.as_str()),
    })
}
