//! Record assembly.

use std::path::Path;

use crate::checksum;
use crate::error::Result;
use crate::identity;
use crate::types::{
    Approval, Artifact, ContentMetadata, Coverage, Domain, Source, SCHEMA_VERSION, SOURCE_KIND,
};

/// Run-wide inputs shared by every record.
#[derive(Clone, Debug)]
pub struct RecordContext {
    pub domain: Domain,
    /// `YYYY-MM-DD`; used for the source revision and the approval timestamp.
    pub revision_date: String,
    /// Overrides the derived `SRC_<contentId>` for all files.
    pub source_id: Option<String>,
    /// Approver recorded on the initial approval.
    pub approver: Option<String>,
}

impl RecordContext {
    pub fn new(domain: Domain, revision_date: impl Into<String>) -> Self {
        Self {
            domain,
            revision_date: revision_date.into(),
            source_id: None,
            approver: None,
        }
    }

    pub fn with_source_id(mut self, source_id: Option<String>) -> Self {
        // An empty override means "derive it"
        self.source_id = source_id.filter(|s| !s.is_empty());
        self
    }

    pub fn with_approver(mut self, approver: Option<String>) -> Self {
        self.approver = approver;
        self
    }

    fn source_id_for(&self, content_id: &str) -> String {
        self.source_id
            .clone()
            .unwrap_or_else(|| format!("SRC_{}", content_id))
    }
}

/// Build a record from already-derived pieces. Does no I/O.
pub fn assemble(ctx: &RecordContext, path: &Path, rel_path: &str, sha256: String) -> ContentMetadata {
    let content_id = identity::content_id(ctx.domain, rel_path);
    let year = identity::infer_year(&identity::file_stem(path));
    let (effective_from, effective_to) = identity::effective_range(year);

    ContentMetadata {
        schema_version: SCHEMA_VERSION,
        domain: ctx.domain,
        artifact: Artifact {
            path: rel_path.to_string(),
            sha256,
            media_type: identity::media_type(path).to_string(),
        },
        coverage: Coverage {
            year,
            effective_from,
            effective_to,
            jurisdictions: None,
        },
        source: Source {
            kind: SOURCE_KIND.to_string(),
            id: ctx.source_id_for(&content_id),
            revision_date: ctx.revision_date.clone(),
            checksum_sha256: None,
        },
        approvals: vec![Approval::initial(&ctx.revision_date, ctx.approver.clone())],
        content_id,
    }
}

/// Hash `path` and build its record.
pub fn build(ctx: &RecordContext, path: &Path, rel_path: &str) -> Result<ContentMetadata> {
    let sha256 = checksum::sha256_file(path)?;
    Ok(assemble(ctx, path, rel_path, sha256))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_assemble_with_year() {
        let ctx = RecordContext::new(Domain::Tax, "2024-01-15").with_approver(Some("jdoe".into()));
        let meta = assemble(
            &ctx,
            Path::new("/repo/federal/income_2023.csv"),
            "federal/income_2023.csv",
            "00".repeat(32),
        );

        assert_eq!(meta.schema_version, 1);
        assert_eq!(meta.content_id, "TAX_INCOME_2023");
        assert_eq!(meta.domain, Domain::Tax);
        assert_eq!(meta.artifact.path, "federal/income_2023.csv");
        assert_eq!(meta.artifact.media_type, "text/csv");
        assert_eq!(meta.coverage.year, Some(2023));
        assert_eq!(meta.coverage.effective_from.as_deref(), Some("2023-01-01"));
        assert_eq!(meta.coverage.effective_to.as_deref(), Some("9999-12-31"));
        assert!(meta.coverage.jurisdictions.is_none());
        assert_eq!(meta.source.kind, "INTERNAL_OR_CURATED_SOURCE");
        assert_eq!(meta.source.id, "SRC_TAX_INCOME_2023");
        assert_eq!(meta.source.revision_date, "2024-01-15");
        assert!(meta.source.checksum_sha256.is_none());
        assert_eq!(meta.approvals.len(), 1);
        assert_eq!(meta.approvals[0].approved_at, "2024-01-15");
        assert_eq!(meta.approvals[0].name.as_deref(), Some("jdoe"));
    }

    #[test]
    fn test_assemble_without_year() {
        let ctx = RecordContext::new(Domain::Labor, "2024-03-01");
        let meta = assemble(&ctx, Path::new("overtime_rules.json"), "overtime_rules.json", String::new());
        assert_eq!(meta.content_id, "LABOR_OVERTIME_RULES");
        assert_eq!(meta.coverage.year, None);
        assert_eq!(meta.coverage.effective_from, None);
        assert_eq!(meta.coverage.effective_to, None);
        assert_eq!(meta.approvals[0].name, None);
    }

    #[test]
    fn test_year_comes_from_stem_only() {
        // Directory names do not contribute a year
        let ctx = RecordContext::new(Domain::Tax, "2024-01-15");
        let meta = assemble(&ctx, Path::new("/repo/2019/rates.csv"), "2019/rates.csv", String::new());
        assert_eq!(meta.coverage.year, None);
    }

    #[test]
    fn test_source_id_override() {
        let ctx = RecordContext::new(Domain::Tax, "2024-01-15")
            .with_source_id(Some("IRS_PUB_15T".to_string()));
        let a = assemble(&ctx, Path::new("a.csv"), "a.csv", String::new());
        let b = assemble(&ctx, Path::new("b.csv"), "b.csv", String::new());
        assert_eq!(a.source.id, "IRS_PUB_15T");
        assert_eq!(b.source.id, "IRS_PUB_15T");
    }

    #[test]
    fn test_empty_source_id_falls_back() {
        let ctx = RecordContext::new(Domain::Tax, "2024-01-15").with_source_id(Some(String::new()));
        let meta = assemble(&ctx, Path::new("a.csv"), "a.csv", String::new());
        assert_eq!(meta.source.id, "SRC_TAX_A");
    }

    #[test]
    fn test_build_hashes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("income_2023.csv");
        fs::write(&path, b"a,b\n1,2\n").unwrap();

        let ctx = RecordContext::new(Domain::Tax, "2024-01-15");
        let meta = build(&ctx, &path, "income_2023.csv").unwrap();
        assert_eq!(meta.artifact.sha256, checksum::sha256_bytes(b"a,b\n1,2\n"));
    }
}
