//! contentmeta - metadata sidecars for tax and labor reference content.
//!
//! Walks the files selected by `--glob` under `--root` and writes a
//! `<file>.metadata.json` next to each one, recording its checksum,
//! inferred coverage, content id, provenance and initial approval.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::generate::{self, GenerateArgs};
use config::MetaConfig;
use contentmeta_core::Domain;
use output::OutputFormat;

/// Validate a `YYYY-MM-DD` calendar date, keeping the caller's spelling.
fn parse_revision_date(s: &str) -> Result<String, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("'{}' is not a valid date: {}", s, e))?;
    if date.format("%Y-%m-%d").to_string() != s {
        return Err(format!("'{}' must be written as YYYY-MM-DD", s));
    }
    Ok(s.to_string())
}

/// Regulatory domain as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DomainArg {
    Tax,
    Labor,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Tax => Domain::Tax,
            DomainArg::Labor => Domain::Labor,
        }
    }
}

/// Generate metadata sidecars for tax and labor content files.
#[derive(Parser)]
#[command(name = "contentmeta")]
#[command(author, version)]
#[command(about = "Generate metadata sidecars for tax and labor content files")]
#[command(after_help = "Examples:
  contentmeta --root tax-config --domain tax --glob 'rates/**/*.csv'
  contentmeta --root labor --domain labor --glob '*.json' --glob '*.sql' --dry-run")]
pub struct Cli {
    /// Repository root; artifact paths are recorded relative to it
    #[arg(long)]
    root: PathBuf,

    /// Metadata domain (prefixes content ids)
    #[arg(long, value_enum)]
    domain: DomainArg,

    /// Revision date stamped on source and approval (YYYY-MM-DD, default: today)
    #[arg(long, value_parser = parse_revision_date)]
    revision_date: Option<String>,

    /// Source id for all generated records (default: SRC_<contentId>)
    #[arg(long)]
    source_id: Option<String>,

    /// Glob relative to root; can be repeated
    #[arg(long = "glob", required = true, value_name = "PATTERN")]
    globs: Vec<String>,

    /// Approver name recorded on the initial approval
    #[arg(long, env = "USER")]
    approver: Option<String>,

    /// Show what would be written without writing sidecars
    #[arg(long)]
    dry_run: bool,

    /// Fail when distinct files derive the same content id
    #[arg(long)]
    strict: bool,

    /// Summary format (overrides config default)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = MetaConfig::load(&cli.root);

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default()
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let revision_date = cli
        .revision_date
        .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());

    let args = GenerateArgs {
        root: cli.root,
        domain: cli.domain.into(),
        revision_date,
        source_id: cli.source_id,
        approver: cli.approver.filter(|name| !name.is_empty()),
        globs: cli.globs,
        dry_run: cli.dry_run,
        strict: cli.strict,
    };

    generate::run(args, &config, format, cli.quiet)
}
