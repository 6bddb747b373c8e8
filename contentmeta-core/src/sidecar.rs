//! Sidecar naming and JSON rendering.
//!
//! The sidecar for `rates_2024.csv` is `rates_2024.csv.metadata.json`: the
//! full original filename is kept so `foo.csv` and `foo.json` never share a
//! sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MetaError, Result};
use crate::types::ContentMetadata;

/// Suffix appended to the original filename.
pub const SIDECAR_SUFFIX: &str = ".metadata.json";

/// Sidecar path for a content file.
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(SIDECAR_SUFFIX);
    path.with_file_name(name)
}

/// Render a record as sidecar text.
///
/// Keys are sorted at every level (the record is routed through
/// `serde_json::Value`, whose maps are ordered), indented by two spaces,
/// and the text ends with a newline.
pub fn render(meta: &ContentMetadata) -> Result<String> {
    let value = serde_json::to_value(meta)?;
    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    Ok(out)
}

/// Write the sidecar for `source_path`, replacing any previous one.
pub fn write(source_path: &Path, meta: &ContentMetadata) -> Result<PathBuf> {
    let target = sidecar_path(source_path);
    let text = render(meta)?;
    fs::write(&target, text).map_err(|source| MetaError::Write {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}
