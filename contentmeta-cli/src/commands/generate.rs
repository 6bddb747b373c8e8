//! Generate metadata sidecars for every file matched under the root.

use anyhow::{Context, Result};
use contentmeta_core::pipeline::{self, RunOptions};
use contentmeta_core::record::RecordContext;
use contentmeta_core::Domain;
use std::path::PathBuf;
use tracing::info;

use crate::config::MetaConfig;
use crate::output::{self, OutputFormat};

/// Resolved arguments for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub root: PathBuf,
    pub domain: Domain,
    pub revision_date: String,
    pub source_id: Option<String>,
    pub approver: Option<String>,
    pub globs: Vec<String>,
    pub dry_run: bool,
    pub strict: bool,
}

/// Run generation and print the summary.
pub fn run(args: GenerateArgs, config: &MetaConfig, format: OutputFormat, quiet: bool) -> Result<()> {
    let context = RecordContext::new(args.domain, args.revision_date)
        .with_source_id(args.source_id)
        .with_approver(args.approver);

    let options = RunOptions::new(&args.root, args.domain, context.revision_date.clone())
        .with_globs(args.globs)
        .with_exclude(config.exclude_patterns().to_vec())
        .with_context(context)
        .dry_run(args.dry_run)
        .strict(args.strict || config.strict());

    let report = pipeline::run(&options).with_context(|| {
        format!(
            "Failed to generate {} metadata under {}",
            args.domain,
            args.root.display()
        )
    })?;

    info!(
        "Processed {} file(s) in {:.1}ms",
        report.len(),
        report.duration.as_secs_f64() * 1000.0
    );

    output::print_summary(&report, format, quiet)
}
