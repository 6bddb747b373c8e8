//! Generation pipeline: resolve files, derive records, write sidecars.
//!
//! Files are processed one after another in resolution order. The first
//! failure ends the run; sidecars written before it are left in place.

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{MetaError, Result};
use crate::fileset::{self, ResolvedFile};
use crate::identity;
use crate::record::{self, RecordContext};
use crate::sidecar::{self, SIDECAR_SUFFIX};
use crate::types::Domain;

/// Inputs for one generation run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub root: PathBuf,
    pub globs: Vec<String>,
    /// Root-relative patterns removed from the resolved set.
    pub exclude: Vec<String>,
    pub context: RecordContext,
    /// Derive and hash, but do not write sidecars.
    pub dry_run: bool,
    /// Fail when two files map to the same content id.
    pub strict: bool,
}

impl RunOptions {
    pub fn new(root: impl Into<PathBuf>, domain: Domain, revision_date: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            globs: Vec::new(),
            exclude: Vec::new(),
            context: RecordContext::new(domain, revision_date),
            dry_run: false,
            strict: false,
        }
    }

    pub fn with_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globs = globs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_context(mut self, context: RecordContext) -> Self {
        self.context = context;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Outcome for a single file.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub path: String,
    pub content_id: String,
    pub year: Option<i32>,
    pub sha256: String,
    /// Root-relative sidecar path.
    pub sidecar: String,
}

/// Result of a generation run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub files: Vec<ProcessedFile>,
    pub dry_run: bool,
    pub collisions: Vec<Collision>,
    pub duration: Duration,
}

impl RunReport {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Several files deriving the same content id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collision {
    pub content_id: String,
    /// Root-relative paths in resolution order.
    pub paths: Vec<String>,
}

impl From<Collision> for MetaError {
    fn from(c: Collision) -> Self {
        MetaError::ContentIdCollision {
            content_id: c.content_id,
            paths: c.paths,
        }
    }
}

/// Group files whose content ids clash, in order of first appearance.
pub fn find_collisions(domain: Domain, files: &[ResolvedFile]) -> Vec<Collision> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, Vec<String>> = HashMap::new();

    for file in files {
        let id = identity::content_id(domain, &file.rel_path);
        let paths = by_id.entry(id.clone()).or_default();
        if paths.is_empty() {
            order.push(id);
        }
        paths.push(file.rel_path.clone());
    }

    order
        .into_iter()
        .filter_map(|content_id| {
            let paths = by_id.remove(&content_id)?;
            (paths.len() > 1).then_some(Collision { content_id, paths })
        })
        .collect()
}

/// Run the pipeline end to end.
pub fn run(options: &RunOptions) -> Result<RunReport> {
    let start = Instant::now();
    let root = fileset::canonical_root(&options.root)?;
    let exclude = fileset::compile_excludes(&options.exclude)?;

    info!("Resolving {} pattern(s) under {}", options.globs.len(), root.display());
    let files = fileset::resolve(&root, &options.globs, &exclude)?;
    info!("Resolved {} file(s)", files.len());

    let collisions = find_collisions(options.context.domain, &files);
    if let Some(first) = collisions.first() {
        if options.strict {
            return Err(first.clone().into());
        }
        for c in &collisions {
            warn!(
                "Content id {} is shared by {} files: {}",
                c.content_id,
                c.paths.len(),
                c.paths.join(", ")
            );
        }
    }

    let mut processed = Vec::with_capacity(files.len());
    for file in &files {
        let meta = record::build(&options.context, &file.path, &file.rel_path)?;

        if options.dry_run {
            debug!("Dry run: skipping sidecar for {}", file.rel_path);
        } else {
            let target = sidecar::write(&file.path, &meta)?;
            info!("Wrote {}", target.display());
        }

        processed.push(ProcessedFile {
            sidecar: format!("{}{}", file.rel_path, SIDECAR_SUFFIX),
            path: meta.artifact.path,
            content_id: meta.content_id,
            year: meta.coverage.year,
            sha256: meta.artifact.sha256,
        });
    }

    Ok(RunReport {
        files: processed,
        dry_run: options.dry_run,
        collisions,
        duration: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::sha256_bytes;
    use crate::types::ContentMetadata;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn read_sidecar(path: &Path) -> ContentMetadata {
        let text = fs::read_to_string(path).unwrap();
        assert!(text.ends_with("}\n"));
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("income_2023.csv"), b"a,b\n1,2\n").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let options = RunOptions::new(dir.path(), Domain::Tax, "2024-01-15").with_globs(["*.csv"]);
        let report = run(&options).unwrap();

        assert_eq!(report.len(), 1);
        assert!(!report.dry_run);
        assert_eq!(report.files[0].sidecar, "income_2023.csv.metadata.json");

        let meta = read_sidecar(&dir.path().join("income_2023.csv.metadata.json"));
        assert_eq!(meta.content_id, "TAX_INCOME_2023");
        assert_eq!(meta.coverage.year, Some(2023));
        assert_eq!(meta.coverage.effective_from.as_deref(), Some("2023-01-01"));
        assert_eq!(meta.source.revision_date, "2024-01-15");
        assert_eq!(meta.artifact.sha256, sha256_bytes(b"a,b\n1,2\n"));
        assert!(!dir.path().join("notes.txt.metadata.json").exists());
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("rates_2024.csv"), b"r\n0.1\n").unwrap();
        let options = RunOptions::new(dir.path(), Domain::Labor, "2024-06-30")
            .with_globs(["*.csv"])
            .with_context(
                RecordContext::new(Domain::Labor, "2024-06-30").with_approver(Some("ops".into())),
            );

        run(&options).unwrap();
        let first = fs::read(dir.path().join("rates_2024.csv.metadata.json")).unwrap();
        // The sidecar from the first run must not be picked up as input
        let report = run(&options).unwrap();
        let second = fs::read(dir.path().join("rates_2024.csv.metadata.json")).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_stem_different_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("foo.csv"), b"1").unwrap();
        fs::write(dir.path().join("foo.json"), b"2").unwrap();

        let options = RunOptions::new(dir.path(), Domain::Tax, "2024-01-15")
            .with_globs(["foo.*"]);
        let report = run(&options).unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].content_id, "TAX_FOO");
        assert_eq!(report.collisions[0].paths, vec!["foo.csv", "foo.json"]);

        let csv = read_sidecar(&dir.path().join("foo.csv.metadata.json"));
        let json = read_sidecar(&dir.path().join("foo.json.metadata.json"));
        assert_eq!(csv.artifact.media_type, "text/csv");
        assert_eq!(json.artifact.media_type, "application/json");
    }

    #[test]
    fn test_strict_rejects_collisions_before_writing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a-b.csv"), b"1").unwrap();
        fs::write(dir.path().join("a_b.csv"), b"2").unwrap();

        let options = RunOptions::new(dir.path(), Domain::Tax, "2024-01-15")
            .with_globs(["*.csv"])
            .strict(true);
        let err = run(&options).unwrap_err();

        match err {
            MetaError::ContentIdCollision { content_id, paths } => {
                assert_eq!(content_id, "TAX_A_B");
                assert_eq!(paths, vec!["a-b.csv", "a_b.csv"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("a-b.csv.metadata.json").exists());
        assert!(!dir.path().join("a_b.csv.metadata.json").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("income_2023.csv"), b"a,b\n1,2\n").unwrap();

        let options = RunOptions::new(dir.path(), Domain::Tax, "2024-01-15")
            .with_globs(["*.csv"])
            .dry_run(true);
        let report = run(&options).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.files[0].content_id, "TAX_INCOME_2023");
        assert_eq!(report.files[0].sha256, sha256_bytes(b"a,b\n1,2\n"));
        assert!(!dir.path().join("income_2023.csv.metadata.json").exists());
    }

    #[test]
    fn test_excluded_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive/old_2001.csv"), b"x").unwrap();
        fs::write(dir.path().join("current_2024.csv"), b"y").unwrap();

        let options = RunOptions::new(dir.path(), Domain::Tax, "2024-01-15")
            .with_globs(["**/*.csv"])
            .with_exclude(vec!["archive/**".to_string()]);
        let report = run(&options).unwrap();

        let paths: Vec<_> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["current_2024.csv"]);
    }

    #[test]
    fn test_invalid_root() {
        let dir = TempDir::new().unwrap();
        let options = RunOptions::new(dir.path().join("missing"), Domain::Tax, "2024-01-15")
            .with_globs(["*.csv"]);
        assert!(matches!(run(&options), Err(MetaError::InvalidRoot { .. })));
    }

    #[test]
    fn test_find_collisions_preserves_order() {
        let files: Vec<ResolvedFile> = ["x/rates.csv", "unique.csv", "y/rates.json", "z/RATES.sql"]
            .iter()
            .map(|p| ResolvedFile {
                path: PathBuf::from(p),
                rel_path: p.to_string(),
            })
            .collect();

        let collisions = find_collisions(Domain::Tax, &files);
        assert_eq!(
            collisions,
            vec![Collision {
                content_id: "TAX_RATES".to_string(),
                paths: vec![
                    "x/rates.csv".to_string(),
                    "y/rates.json".to_string(),
                    "z/RATES.sql".to_string()
                ],
            }]
        );
    }
}
