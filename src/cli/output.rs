//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::ValidationResult;
use crate::reconciler::{
    AggregateRead, DriftReport, DriftStatus, Lifecycle, Reconciled, ReconciliationResult,
};
use crate::toadlester::HealthStatus;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Snapshot row for table display.
#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Drift row for table display.
#[derive(Tabled)]
struct DriftRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Desired")]
    desired: String,
    #[tabled(rename = "Observed")]
    observed: String,
}

/// Reconcile outcome row for table display.
#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Identity")]
    identity: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of a single lifecycle operation.
    #[must_use]
    pub fn format_reconciled(&self, intent: Lifecycle, reconciled: &Reconciled) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "operation": intent,
                "name": reconciled.setting.name,
                "value": reconciled.setting.value,
                "algo": reconciled.setting.algo,
                "id": reconciled.identity,
            }))
            .unwrap_or_default(),
            OutputFormat::Text => format!(
                "{} {intent} {}\n   id: {}\n",
                "✓".green(),
                reconciled.setting,
                reconciled.identity.as_str().dimmed()
            ),
        }
    }

    /// Formats an aggregate read.
    #[must_use]
    pub fn format_snapshot(&self, aggregate: &AggregateRead) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(aggregate).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();
                let _ = writeln!(output, "\nRemote configuration at {}", aggregate.endpoint.bold());
                let _ = writeln!(output, "   id: {}\n", aggregate.identity.as_str().dimmed());

                if aggregate.snapshot.is_empty() {
                    output.push_str("   (empty)\n");
                    return output;
                }

                let rows: Vec<SnapshotRow> = aggregate
                    .snapshot
                    .iter()
                    .map(|(name, value)| SnapshotRow {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                    .collect();
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    /// Formats a drift report.
    #[must_use]
    pub fn format_drift(&self, report: &DriftReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "converged": report.is_converged(),
                "entries": report.entries,
            }))
            .unwrap_or_default(),
            OutputFormat::Text => {
                if report.is_converged() {
                    return format!(
                        "{} No drift detected - remote configuration matches.\n",
                        "✓".green()
                    );
                }

                let rows: Vec<DriftRow> = report
                    .entries
                    .iter()
                    .map(|e| DriftRow {
                        status: Self::format_drift_status(&e.status),
                        name: e.desired.name.clone(),
                        desired: e.desired.value.clone(),
                        observed: match &e.status {
                            DriftStatus::InSync => e.desired.value.clone(),
                            DriftStatus::Drifted { observed } => observed.clone(),
                            DriftStatus::Missing => String::from("-"),
                        },
                    })
                    .collect();

                let mut output = String::new();
                output.push_str(&Table::new(rows).to_string());
                let _ = write!(
                    output,
                    "\n\n{} of {} settings drifted\n",
                    report.drifted().len().to_string().yellow(),
                    report.entries.len()
                );
                output
            }
        }
    }

    /// Formats a reconciliation result.
    #[must_use]
    pub fn format_reconciliation(&self, result: &ReconciliationResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();

                let rows: Vec<OutcomeRow> = result
                    .outcomes
                    .iter()
                    .map(|o| OutcomeRow {
                        action: match (o.action, &o.error) {
                            (_, Some(_)) => "failed".red().to_string(),
                            (Some(action), None) => Self::format_action(action),
                            (None, None) => "noop".dimmed().to_string(),
                        },
                        name: o.name.clone(),
                        identity: o
                            .identity
                            .as_ref()
                            .map_or_else(|| String::from("-"), ToString::to_string),
                    })
                    .collect();

                if !rows.is_empty() {
                    output.push_str(&Table::new(rows).to_string());
                    output.push_str("\n\n");
                }

                let _ = write!(output, "{result}");
                output
            }
        }
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "valid": result.is_valid(),
                "warnings": result.warnings,
            }))
            .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!("{} Manifest is valid!\n", "✓".green());
                if show_warnings && !result.warnings.is_empty() {
                    output.push_str("\nWarnings:\n");
                    for warning in &result.warnings {
                        let _ = writeln!(output, "  {} {warning}", "⚠".yellow());
                    }
                }
                output
            }
        }
    }

    /// Formats a health probe result.
    #[must_use]
    pub fn format_health(&self, status: &HealthStatus) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(status).unwrap_or_default(),
            OutputFormat::Text => {
                if status.healthy {
                    format!(
                        "{} {} ({} ms)\n",
                        "healthy".green(),
                        status.url,
                        status.response_time_ms.unwrap_or_default()
                    )
                } else {
                    format!(
                        "{} {}: {}\n",
                        "unhealthy".red(),
                        status.url,
                        status.error.as_deref().unwrap_or("unknown error")
                    )
                }
            }
        }
    }

    /// Formats a lifecycle action with color.
    fn format_action(action: Lifecycle) -> String {
        match action {
            Lifecycle::Create => "+create".green().to_string(),
            Lifecycle::Update => "~update".yellow().to_string(),
            Lifecycle::Delete => "-delete".red().to_string(),
            Lifecycle::Read => "read".dimmed().to_string(),
        }
    }

    /// Formats a drift status with color.
    fn format_drift_status(status: &DriftStatus) -> String {
        match status {
            DriftStatus::InSync => "in sync".green().to_string(),
            DriftStatus::Drifted { .. } => "drifted".yellow().to_string(),
            DriftStatus::Missing => "missing".red().to_string(),
        }
    }
}
