//! Run summary rendering.
//!
//! `table` is for people at a terminal, `json` is for scripts and CI logs.

use clap::ValueEnum;
use colored::Colorize;
use contentmeta_core::pipeline::{ProcessedFile, RunReport};
use serde::Serialize;
use std::str::FromStr;
use tabled::{builder::Builder, settings::style::Style};

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    dry_run: bool,
    files: &'a [ProcessedFile],
    written: usize,
}

/// Number of digest characters shown in the table.
const SHORT_DIGEST: usize = 12;

fn short_digest(sha256: &str) -> &str {
    sha256.get(..SHORT_DIGEST).unwrap_or(sha256)
}

/// Render the summary as a table followed by a totals line.
pub fn format_table(report: &RunReport) -> String {
    if report.is_empty() {
        return format!("{}", "No files matched.".yellow());
    }

    let mut builder = Builder::default();
    builder.push_record(["Path", "Content ID", "Year", "SHA-256"]);
    for file in &report.files {
        builder.push_record([
            file.path.clone(),
            file.content_id.clone(),
            file.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            short_digest(&file.sha256).to_string(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());

    let total = if report.dry_run {
        format!("Would write {} sidecar(s) (dry run)", report.len())
    } else {
        format!("Wrote {} sidecar(s)", report.len())
    };

    let mut out = table.to_string();
    out.push('\n');
    out.push_str(&total.green().to_string());
    if !report.collisions.is_empty() {
        out.push('\n');
        out.push_str(
            &format!("{} content id collision(s)", report.collisions.len())
                .yellow()
                .to_string(),
        );
    }
    out
}

/// Render the summary as pretty-printed JSON.
pub fn format_json(report: &RunReport) -> anyhow::Result<String> {
    let summary = JsonSummary {
        dry_run: report.dry_run,
        files: &report.files,
        written: if report.dry_run { 0 } else { report.len() },
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Print the summary to stdout. `quiet` suppresses the table but never JSON.
pub fn print_summary(report: &RunReport, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(report)?),
        OutputFormat::Table if quiet => {}
        OutputFormat::Table => println!("{}", format_table(report)),
    }
    Ok(())
}
