//! Optional archive integrity check.
//!
//! When an update descriptor carries an expected SHA-256 digest the
//! downloaded package is verified before extraction. Descriptors
//! without a digest skip this entirely; update signing is explicitly
//! out of scope.

use crate::error::{Result, UpdateError};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        fs::File::open(path).map_err(|e| UpdateError::DownloadFailed(e.to_string()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| UpdateError::DownloadFailed(e.to_string()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Verify a downloaded archive against an expected lowercase hex
/// digest. Mismatch is a transient download failure, never an
/// ignore-list event.
pub fn verify_archive(path: &Path, expected: &str) -> Result<()> {
    let got = sha256_file(path)?;
    let want = expected.trim().to_lowercase();
    if got != want {
        return Err(UpdateError::DownloadFailed(format!(
            "checksum mismatch (got {got}, want {want})"
        )));
    }
    Ok(())
}
