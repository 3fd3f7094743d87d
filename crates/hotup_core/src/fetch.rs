//! Update package download.
//!
//! The manager consumes downloads through the `Fetcher` trait so tests
//! and embedders can substitute their own transport. `HttpFetcher` is
//! the blocking reqwest implementation; call it from a worker thread.

use crate::error::{Result, UpdateError};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cooperative cancellation for an in-flight download. Cancelling
/// after staging has completed is a no-op; the staged content is
/// simply never installed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a fetch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Completed,
    Cancelled,
}

/// Downloads an update package to a local file.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, dest: &Path, cancel: &CancelToken) -> Result<FetchStatus>;
}

/// Blocking HTTPS download with rustls.
pub struct HttpFetcher {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(600),
        }
    }

    pub fn with_timeouts(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            read_timeout,
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path, cancel: &CancelToken) -> Result<FetchStatus> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.read_timeout)
            .build()
            .map_err(|e| UpdateError::DownloadFailed(e.to_string()))?;

        info!("downloading update from {url}");

        let mut resp = client
            .get(url)
            .send()
            .map_err(|e| UpdateError::DownloadFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(UpdateError::HttpError(format!(
                "status {}",
                resp.status().as_u16()
            )));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| UpdateError::TempDirError(e.to_string()))?;
        }

        let mut out =
            fs::File::create(dest).map_err(|e| UpdateError::TempDirError(e.to_string()))?;

        let mut buf = [0u8; 8192];
        let mut total: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                info!("download cancelled after {total} bytes");
                return Ok(FetchStatus::Cancelled);
            }
            let n = resp
                .read(&mut buf)
                .map_err(|e| UpdateError::DownloadFailed(e.to_string()))?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])
                .map_err(|e| UpdateError::DownloadFailed(e.to_string()))?;
            total += n as u64;
        }

        if total == 0 {
            return Err(UpdateError::DownloadFailed(
                "downloaded file is empty".into(),
            ));
        }

        debug!("download complete, {total} bytes");
        Ok(FetchStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
