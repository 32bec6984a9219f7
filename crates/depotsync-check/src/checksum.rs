//! File checksum computation
//!
//! Tracked records store lowercase hex SHA-256 checksums; this module
//! computes the matching digest for on-disk files so the conflict scanner
//! can compare them.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Computes the SHA-256 checksum of a file
///
/// Returns `None` when the file does not exist (a deleted file is a
/// divergence, not an error).
///
/// # Errors
/// Fails on I/O errors other than the file being absent.
pub async fn file_checksum(path: &Path) -> anyhow::Result<Option<String>> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(checksum_bytes(&data))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Computes the SHA-256 checksum of a byte slice
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
