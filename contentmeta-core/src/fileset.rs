//! File set resolution: glob patterns under a root to an ordered file list.
//!
//! Patterns are expanded one at a time, each result set sorted, then
//! concatenated in pattern order. A file matched by several patterns keeps
//! the position of its first match. Directories and generated sidecars are
//! never part of the set.

use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::{MetaError, Result};
use crate::sidecar::SIDECAR_SUFFIX;

/// Path-style matching: `*` stops at `/`, dotfiles match.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A file selected for metadata generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Root-relative path with forward slashes.
    pub rel_path: String,
}

/// Canonicalize the root and check that it is a directory.
pub fn canonical_root(root: &Path) -> Result<PathBuf> {
    let invalid = || MetaError::InvalidRoot {
        path: root.to_path_buf(),
    };
    let canonical = root.canonicalize().map_err(|_| invalid())?;
    if !canonical.is_dir() {
        return Err(invalid());
    }
    Ok(canonical)
}

/// Forward-slash path relative to `root`.
///
/// Fails for paths that do not live under `root` (including `..` escapes).
pub fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let outside = || MetaError::OutsideRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };
    let rel = path.strip_prefix(root).map_err(|_| outside())?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(outside()),
        }
    }
    Ok(parts.join("/"))
}

/// Compile exclusion patterns, matched later against root-relative paths.
pub fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| MetaError::InvalidPattern {
                pattern: p.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

/// Expand one pattern relative to `root`, sorted.
fn expand_pattern(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root_str = root.to_string_lossy();
    let full = format!(
        "{}/{}",
        Pattern::escape(root_str.trim_end_matches('/')),
        pattern.trim_start_matches("./")
    );

    let entries = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| MetaError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })?;

    let mut matched = Vec::new();
    for entry in entries {
        let path = entry.map_err(|source| MetaError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        matched.push(path);
    }
    matched.sort();

    if matched.is_empty() {
        debug!("Pattern '{}' matched nothing under {}", pattern, root.display());
    }
    Ok(matched)
}

fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(SIDECAR_SUFFIX))
        .unwrap_or(false)
}

/// Resolve `patterns` under `root` into an ordered, duplicate-free file list.
///
/// `root` must already be canonical (see [`canonical_root`]). `exclude`
/// patterns drop files whose root-relative path they match.
pub fn resolve(root: &Path, patterns: &[String], exclude: &[Pattern]) -> Result<Vec<ResolvedFile>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        for path in expand_pattern(root, pattern)? {
            let rel_path = relative_path(root, &path)?;
            if !seen.insert(rel_path.clone()) {
                continue;
            }
            if path.is_dir() || is_sidecar(&path) {
                continue;
            }
            if let Some(hit) = exclude
                .iter()
                .find(|p| p.matches_with(&rel_path, MATCH_OPTIONS))
            {
                debug!("Excluding {} (matches '{}')", rel_path, hit.as_str());
                continue;
            }
            debug!("Matched {}", rel_path);
            files.push(ResolvedFile { path, rel_path });
        }
    }

    Ok(files)
}
