//! Persisted update state.
//!
//! Single source of truth for which content version is installed,
//! what is in flight, and which versions are permanently ignored.
//! Stored as pretty-printed JSON next to the content roots and written
//! atomically (temp file + rename) so a crash between field writes can
//! never corrupt the last committed record.
//!
//! The in-flight portion is one tagged `Lifecycle` variant rather than
//! a bag of booleans, so illegal combinations (a "ready" flag with no
//! pending version, a canary for a version that is not installed) are
//! unrepresentable.

use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// File name of the persisted record, relative to the content base dir.
pub const STATE_FILE_NAME: &str = "update_state.json";

/// Current schema version.
pub const STATE_SCHEMA: u32 = 1;

/// Where the updater currently is in the check → stage → activate →
/// confirm cycle. Exactly one phase at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Lifecycle {
    /// Nothing in flight.
    Idle,
    /// A download/stage operation was started and has not completed.
    /// Found at load time, this means the process died mid-download.
    Downloading { version: Version, url: String },
    /// An update is fully staged on disk and can be installed.
    Staged { version: Version },
    /// An update was just activated and awaits the host's canary
    /// verdict. The version always equals `installed_version`.
    CanaryPending { version: Version },
}

/// The persisted update record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateState {
    /// Schema version of this record.
    pub schema: u32,
    /// Version of the content root currently served to the app.
    pub installed_version: Version,
    /// Last-known-good version, kept as a rollback target while a
    /// canary is outstanding.
    pub previous_version: Option<Version>,
    /// Versions that failed canary and must never be auto-applied.
    #[serde(default)]
    pub ignore_list: BTreeSet<Version>,
    /// Versions successfully installed on this device, oldest first.
    #[serde(default)]
    pub version_history: Vec<Version>,
    /// Current phase of the update cycle.
    pub lifecycle: Lifecycle,
    /// When this record was last written.
    pub updated_at: DateTime<Utc>,
}

impl UpdateState {
    /// Fresh record for a first launch: the bundled content is the
    /// installed version and nothing is in flight.
    pub fn first_launch(bundle_version: &Version) -> Self {
        Self {
            schema: STATE_SCHEMA,
            installed_version: bundle_version.clone(),
            previous_version: None,
            ignore_list: BTreeSet::new(),
            version_history: vec![bundle_version.clone()],
            lifecycle: Lifecycle::Idle,
            updated_at: Utc::now(),
        }
    }

    /// Load the record from disk, falling back to a first-launch
    /// record when the file is missing or unreadable. Consistency
    /// violations are healed rather than refused: the app must always
    /// be able to boot into its last good installed version.
    pub fn load(path: &Path, bundle_version: &Version) -> Self {
        let mut state = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<UpdateState>(&content) {
                Ok(state) => state,
                Err(e) => {
                    warn!("update state unreadable ({e}), reinitializing");
                    Self::first_launch(bundle_version)
                }
            },
            Err(_) => Self::first_launch(bundle_version),
        };
        state.self_heal();
        state
    }

    /// Atomically persist the whole record as one transaction.
    pub fn save(&mut self, path: &Path) -> io::Result<()> {
        self.updated_at = Utc::now();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)
    }

    /// Enforce the record's invariants, clearing the offending
    /// in-flight phase instead of failing. Returns true if anything
    /// was changed.
    pub fn self_heal(&mut self) -> bool {
        let mut changed = false;

        // The installed version can never sit on its own denylist.
        if self.ignore_list.remove(&self.installed_version) {
            warn!(
                "installed version {} was on the ignore list, removing",
                self.installed_version
            );
            changed = true;
        }

        match &self.lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Downloading { version, .. } => {
                // The process died mid-download; the operation cannot
                // be resumed, only retried.
                warn!("download of {version} interrupted by restart, resetting");
                self.lifecycle = Lifecycle::Idle;
                changed = true;
            }
            Lifecycle::Staged { version } => {
                if version <= &self.installed_version || self.ignore_list.contains(version) {
                    warn!("staged version {version} is not installable, discarding");
                    self.lifecycle = Lifecycle::Idle;
                    changed = true;
                }
            }
            Lifecycle::CanaryPending { version } => {
                // A canary always refers to the version just activated.
                if version != &self.installed_version {
                    warn!(
                        "canary version {} does not match installed {}, clearing",
                        version, self.installed_version
                    );
                    self.lifecycle = Lifecycle::Idle;
                    changed = true;
                }
            }
        }

        changed
    }

    // Derived views of the lifecycle, kept for the bridge payloads.

    pub fn pending_version(&self) -> Option<&Version> {
        match &self.lifecycle {
            Lifecycle::Downloading { version, .. } | Lifecycle::Staged { version } => Some(version),
            _ => None,
        }
    }

    pub fn has_pending_update(&self) -> bool {
        self.pending_version().is_some()
    }

    pub fn pending_update_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Staged { .. })
    }

    pub fn download_in_progress(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Downloading { .. })
    }

    pub fn canary_version(&self) -> Option<&Version> {
        match &self.lifecycle {
            Lifecycle::CanaryPending { version } => Some(version),
            _ => None,
        }
    }
}
