//! Streaming SHA-256 of file contents.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::error::{MetaError, Result};

/// Read buffer size for hashing.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Compute the lowercase hex SHA-256 of a file.
///
/// The file is read in [`CHUNK_SIZE`] chunks, so memory use does not grow
/// with file size. Any open or read failure is returned as
/// [`MetaError::Read`]; there is no partial digest.
pub fn sha256_file(path: &Path) -> Result<String> {
    let read_err = |source: std::io::Error| MetaError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_err)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(e)),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 of an in-memory buffer.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
