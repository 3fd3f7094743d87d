//! Content switch notification.
//!
//! One-way signal to the host content loader that the active root
//! changed and should be reloaded. The state is already committed by
//! the time this fires; a host that fails to act simply keeps serving
//! stale content until its next reload.

use std::path::Path;
use tracing::info;

pub trait ContentSwitchNotifier: Send + Sync {
    /// The active content root changed; reload from `new_root`.
    fn content_switched(&self, new_root: &Path);
}

/// Logs the switch and nothing else. Useful as a default for hosts
/// that poll the active root themselves.
#[derive(Debug, Default)]
pub struct LoggingNotifier;

impl ContentSwitchNotifier for LoggingNotifier {
    fn content_switched(&self, new_root: &Path) {
        info!("content root switched to {}", new_root.display());
    }
}

/// Drops the signal.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl ContentSwitchNotifier for NullNotifier {
    fn content_switched(&self, _new_root: &Path) {}
}
