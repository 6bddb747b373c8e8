//! contentmeta core - metadata sidecar derivation for reference content.
//!
//! Tax and labor reference files (rate tables, bracket CSVs, SQL seeds) are
//! described by a small JSON record stored next to each file. This crate
//! derives those records:
//!
//! - **File set resolution**: expand glob patterns under a root into a
//!   deduplicated, order-stable file list
//! - **Identity**: content ids, coverage years, and media types from filenames
//! - **Checksums**: streaming SHA-256 of file contents
//! - **Sidecars**: camelCase JSON with sorted keys, written as
//!   `<file>.metadata.json`
//!
//! # Usage
//!
//! ```no_run
//! use contentmeta_core::pipeline::{self, RunOptions};
//! use contentmeta_core::types::Domain;
//!
//! let options = RunOptions::new("/repo/tax-config", Domain::Tax, "2024-01-15")
//!     .with_globs(["rates/**/*.csv"]);
//! let report = pipeline::run(&options)?;
//! println!("wrote {} sidecars", report.len());
//! # Ok::<(), contentmeta_core::MetaError>(())
//! ```

pub mod checksum;
pub mod error;
pub mod fileset;
pub mod identity;
pub mod pipeline;
pub mod record;
pub mod sidecar;
pub mod types;

pub use error::{MetaError, Result};
pub use types::{Approval, Artifact, ContentMetadata, Coverage, Domain, Source};
