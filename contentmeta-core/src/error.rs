//! Error types for contentmeta-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for contentmeta-core operations.
pub type Result<T> = std::result::Result<T, MetaError>;

/// Errors that can occur while deriving or writing metadata sidecars.
#[derive(Error, Debug)]
pub enum MetaError {
    /// Root directory is missing or not a directory.
    #[error("Invalid root directory: {path}")]
    InvalidRoot {
        /// Root that was supplied.
        path: PathBuf,
    },

    /// Glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Pattern as supplied by the caller.
        pattern: String,
        /// Description of the syntax problem.
        message: String,
    },

    /// A directory entry could not be inspected while expanding a pattern.
    #[error("Failed to expand pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    /// A matched path is not located under the root directory.
    #[error("Path {path} is outside root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Source file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sidecar file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be converted to JSON.
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Distinct files normalize to the same content id.
    #[error("Content id {content_id} is derived from multiple files: {}", .paths.join(", "))]
    ContentIdCollision {
        content_id: String,
        paths: Vec<String>,
    },
}
