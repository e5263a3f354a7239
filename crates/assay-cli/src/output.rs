//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use assay_allocator::{AllocationReport, AllocationStatus};
use assay_domain::{LedgerSnapshot, ScoreRecord};
use colored::*;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a score record.
    pub fn format_score_record(&self, record: &ScoreRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(record),
            OutputFormat::Quiet => Ok(record.composite_total.to_string()),
            OutputFormat::Table => Ok(self.score_record_table(record)),
        }
    }

    /// Format an allocation report.
    pub fn format_allocation_report(&self, report: &AllocationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(report),
            OutputFormat::Quiet => Ok(report
                .records
                .iter()
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.allocation_report_table(report)),
        }
    }

    /// Format a ledger snapshot.
    pub fn format_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(snapshot),
            OutputFormat::Quiet => Ok(snapshot.total_remaining().to_string()),
            OutputFormat::Table => Ok(self.snapshot_table(snapshot)),
        }
    }

    fn json<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn score_record_table(&self, record: &ScoreRecord) -> String {
        let dims = &record.dimensions;
        let qualification = record
            .qualification
            .map(|e| e.to_string())
            .unwrap_or_else(|| "none".to_string());
        let validity = match &record.validity {
            Some(v) => format!("{:?}", v.outcome),
            None => "no bundle".to_string(),
        };
        let metals = record
            .recommended_metals
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let rows = [
            ("Submission", record.submission_id.to_string()),
            ("Config version", record.config_version.clone()),
            ("Novelty", format!("{:.1}", dims.novelty)),
            ("Density", format!("{:.1}", dims.density)),
            ("Coherence", format!("{:.1}", dims.coherence)),
            ("Alignment", format!("{:.1}", dims.alignment)),
            ("Base sum", format!("{:.1}", record.modifiers.base_sum)),
            ("Overlap policy", format!("{:?}", record.modifiers.overlap_policy)),
            ("Seed", record.seed.flagged.to_string()),
            ("Edge", record.edge.flagged.to_string()),
            ("Composite total", record.composite_total.to_string()),
            ("Qualification", qualification),
            (
                "Precision",
                format!(
                    "{} ({}, {})",
                    record.precision.index,
                    record.precision.tier.as_str(),
                    record.precision.bubble_class
                ),
            ),
            ("Validity", validity),
            ("Metals", format!("{:?} [{}]", record.metal_recommendation, metals)),
            ("Integrity hash", record.integrity_hash.clone()),
        ];

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (field, value) in rows {
            builder.push_record([field.to_string(), value]);
        }
        self.render(builder)
    }

    fn allocation_report_table(&self, report: &AllocationReport) -> String {
        let mut lines = Vec::new();

        if report.records.is_empty() {
            lines.push(self.colorize("No allocations committed.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Epoch", "Metal", "Amount", "Before", "After"]);
            for record in &report.records {
                let id = record.id.to_string();
                builder.push_record([
                    id.chars().take(8).collect::<String>(),
                    record.epoch.to_string(),
                    record.metal.to_string(),
                    record.amount.to_string(),
                    record.balance_before.to_string(),
                    record.balance_after.to_string(),
                ]);
            }
            lines.push(self.render(builder));
        }

        for declined in &report.declined {
            lines.push(self.warning(&format!("{} declined: {}", declined.metal, declined.reason)));
        }

        let status = match report.status {
            AllocationStatus::Allocated => self.success("Allocated"),
            AllocationStatus::Partial => self.warning("Partially allocated"),
            AllocationStatus::Unallocated => self.info("Unallocated (eligible for retry)"),
        };
        lines.push(status);
        lines.join("\n")
    }

    fn snapshot_table(&self, snapshot: &LedgerSnapshot) -> String {
        let open = snapshot.totals.open_epoch_list();

        let mut builder = Builder::default();
        builder.push_record(["Epoch", "Open", "Metal", "Balance", "Threshold", "Increment", "Halvings"]);
        for pool in &snapshot.balances {
            builder.push_record([
                pool.epoch.to_string(),
                if open.contains(&pool.epoch) { "yes" } else { "no" }.to_string(),
                pool.metal.to_string(),
                pool.balance.to_string(),
                pool.halving_threshold.to_string(),
                pool.per_distribution_increment.to_string(),
                pool.halvings.to_string(),
            ]);
        }

        let totals = format!(
            "Distributed: {}  Allocations: {}  Remaining: {}",
            snapshot.totals.total_distributed,
            snapshot.totals.allocation_count,
            snapshot.total_remaining()
        );
        format!("{}\n{}", self.render(builder), self.info(&totals))
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Whether machine-readable output is selected.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Apply color if enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_domain::{EvaluatorOutput, Genesis};
    use assay_scorer::ScoringPipeline;

    fn record() -> ScoreRecord {
        let output: EvaluatorOutput =
            serde_json::from_str(r#"{"novelty": 2000, "density": 2000, "coherence": 2000, "alignment": 2000}"#)
                .unwrap();
        ScoringPipeline::default_pipeline().score("sub-1", &output).unwrap()
    }

    #[test]
    fn test_score_record_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_score_record(&record()).unwrap();
        let parsed: ScoreRecord = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, record());
    }

    #[test]
    fn test_score_record_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_score_record(&record()).unwrap(), "8000");
    }

    #[test]
    fn test_score_record_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_score_record(&record()).unwrap();
        assert!(output.contains("Composite total"));
        assert!(output.contains("founder"));
    }

    #[test]
    fn test_snapshot_table() {
        let snapshot = LedgerSnapshot {
            balances: Genesis::fixed(1_000).pools(),
            totals: assay_domain::RunningTotals {
                total_distributed: 0,
                allocation_count: 0,
                open_epochs: 1,
            },
        };
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_snapshot(&snapshot).unwrap();
        assert!(output.contains("Remaining: 12000"));
        assert!(output.contains("ecosystem"));
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("failed"), "✗ failed");
    }
}
