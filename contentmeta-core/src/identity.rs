//! Identity and coverage derivation from filenames.
//!
//! Everything here is a pure function of the domain and the file's name,
//! so the same file always gets the same content id and coverage.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::types::{Domain, EFFECTIVE_TO_OPEN};

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(19|20)[0-9]{2}").unwrap());
static KNOWN_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.(json|csv|sql)$").unwrap());
static NON_ALNUM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Derive the content id for a file.
///
/// `rel_path` may be a bare filename or a root-relative path; only the final
/// component contributes. A trailing `.json`, `.csv` or `.sql` is dropped
/// (any case), runs of other characters collapse to `_`, and the result is
/// upper-cased and prefixed with the domain token.
///
/// Distinct names can normalize to the same id (`a-b.csv` and `a_b.json`);
/// see [`crate::pipeline::find_collisions`].
pub fn content_id(domain: Domain, rel_path: &str) -> String {
    let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
    let stem = KNOWN_EXTENSION.replace(name, "");
    let token = NON_ALNUM_RUN.replace_all(&stem, "_").to_uppercase();
    format!("{}_{}", domain.id_prefix(), token.trim_matches('_'))
}

/// Filename without its last extension (`rates_2024.csv` -> `rates_2024`).
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First `19xx` / `20xx` token in a filename stem.
pub fn infer_year(stem: &str) -> Option<i32> {
    YEAR.find(stem).and_then(|m| m.as_str().parse().ok())
}

/// Effective range implied by a coverage year: Jan 1st of that year, open-ended.
pub fn effective_range(year: Option<i32>) -> (Option<String>, Option<String>) {
    match year {
        Some(year) => (
            Some(format!("{}-01-01", year)),
            Some(EFFECTIVE_TO_OPEN.to_string()),
        ),
        None => (None, None),
    }
}

/// Media type from the file extension. Matching is exact: `RATES.CSV` is
/// `application/octet-stream`.
pub fn media_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("sql") => "application/sql",
        _ => "application/octet-stream",
    }
}
