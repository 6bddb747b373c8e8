//! Data model for content metadata records.
//!
//! Field names are snake_case in Rust and camelCase on the wire. Optional
//! fields are always serialized (as `null` when absent) so every sidecar has
//! the same shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version stamp written into every record.
pub const SCHEMA_VERSION: u32 = 1;

/// Provenance kind for content curated in-repo.
pub const SOURCE_KIND: &str = "INTERNAL_OR_CURATED_SOURCE";

/// Role recorded on the initial approval.
pub const APPROVAL_ROLE: &str = "ENGINEERING";

/// Reference recorded on the initial approval.
pub const APPROVAL_REFERENCE: &str = "initial-metadata-standard";

/// Open end of an effective date range.
pub const EFFECTIVE_TO_OPEN: &str = "9999-12-31";

/// Regulatory category a content file belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Tax,
    Labor,
}

impl Domain {
    /// Wire name (`tax`, `labor`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Tax => "tax",
            Domain::Labor => "labor",
        }
    }

    /// Upper-case token used to prefix content ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Domain::Tax => "TAX",
            Domain::Labor => "LABOR",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tax" => Ok(Domain::Tax),
            "labor" => Ok(Domain::Labor),
            _ => Err(format!("Unknown domain: '{}' (expected tax or labor)", s)),
        }
    }
}

/// The file a record describes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Root-relative path with forward slashes.
    pub path: String,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
    pub media_type: String,
}

/// Temporal and jurisdictional applicability window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub year: Option<i32>,
    pub effective_from: Option<String>,
    pub effective_to: Option<String>,
    /// Not populated by filename inference.
    pub jurisdictions: Option<Vec<String>>,
}

/// Where the content came from and as of when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub kind: String,
    pub id: String,
    pub revision_date: String,
    pub checksum_sha256: Option<String>,
}

/// A sign-off attached to a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub role: String,
    pub reference: String,
    pub approved_at: String,
    pub name: Option<String>,
}

impl Approval {
    /// The engineering approval stamped on freshly generated metadata.
    pub fn initial(approved_at: &str, name: Option<String>) -> Self {
        Self {
            role: APPROVAL_ROLE.to_string(),
            reference: APPROVAL_REFERENCE.to_string(),
            approved_at: approved_at.to_string(),
            name,
        }
    }
}

/// Metadata record for one content file.
///
/// Built once per file and written once; reruns replace the sidecar
/// rather than updating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    pub schema_version: u32,
    pub content_id: String,
    pub domain: Domain,
    pub artifact: Artifact,
    pub coverage: Coverage,
    pub source: Source,
    pub approvals: Vec<Approval>,
}
