//! Content root layout.
//!
//! Maps the persisted state onto on-disk directories under a single
//! base dir. Pure path arithmetic; the manager owns all mutation.
//!
//! ```text
//! <base>/www              active root, served to the app
//! <base>/www_previous     backup of the last-known-good root
//! <base>/www_backup       transient hold for a failed root mid-rollback
//! <base>/pending/<ver>    staged update content, keyed by version
//! <base>/tmp              scratch space for download + extraction
//! <base>/update_state.json
//! ```

use crate::state::{UpdateState, STATE_FILE_NAME};
use crate::version::Version;
use std::path::{Path, PathBuf};

/// Directory currently served to the application.
pub const ACTIVE_DIR: &str = "www";

/// Backup of the previous active root, the rollback target.
pub const BACKUP_DIR: &str = "www_previous";

/// Transient hold for the outgoing root during a rollback swap.
pub const ROLLBACK_HOLD_DIR: &str = "www_backup";

/// Parent of per-version staging directories.
pub const STAGING_DIR: &str = "pending";

/// Scratch space; safe to wipe at any time.
pub const TMP_DIR: &str = "tmp";

#[derive(Debug, Clone)]
pub struct ContentRoots {
    base: PathBuf,
}

/// The roots relevant to the current state, resolved in one shot.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoots {
    /// Root the application loads from.
    pub active: PathBuf,
    /// Staging dir of the pending version, if one is in flight.
    pub staging: Option<PathBuf>,
    /// Backup dir, present only while a rollback target is kept.
    pub backup: Option<PathBuf>,
}

impl ContentRoots {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn active(&self) -> PathBuf {
        self.base.join(ACTIVE_DIR)
    }

    pub fn backup(&self) -> PathBuf {
        self.base.join(BACKUP_DIR)
    }

    pub fn rollback_hold(&self) -> PathBuf {
        self.base.join(ROLLBACK_HOLD_DIR)
    }

    pub fn staging_root(&self) -> PathBuf {
        self.base.join(STAGING_DIR)
    }

    pub fn staging(&self, version: &Version) -> PathBuf {
        self.staging_root().join(version.as_str())
    }

    pub fn tmp(&self) -> PathBuf {
        self.base.join(TMP_DIR)
    }

    pub fn state_file(&self) -> PathBuf {
        self.base.join(STATE_FILE_NAME)
    }

    /// Resolve the roots the given state implies. No side effects.
    pub fn resolve(&self, state: &UpdateState) -> ResolvedRoots {
        ResolvedRoots {
            active: self.active(),
            staging: state.pending_version().map(|v| self.staging(v)),
            backup: state.previous_version.as_ref().map(|_| self.backup()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Lifecycle;

    #[test]
    fn test_layout() {
        let roots = ContentRoots::new("/data/app");
        assert_eq!(roots.active(), PathBuf::from("/data/app/www"));
        assert_eq!(roots.backup(), PathBuf::from("/data/app/www_previous"));
        assert_eq!(
            roots.staging(&Version::new("1.2.0")),
            PathBuf::from("/data/app/pending/1.2.0")
        );
        assert_eq!(
            roots.state_file(),
            PathBuf::from("/data/app/update_state.json")
        );
    }

    #[test]
    fn test_resolve_follows_state() {
        let roots = ContentRoots::new("/data/app");
        let mut state = UpdateState::first_launch(&Version::new("1.0.0"));

        let resolved = roots.resolve(&state);
        assert_eq!(resolved.active, roots.active());
        assert!(resolved.staging.is_none());
        assert!(resolved.backup.is_none());

        state.lifecycle = Lifecycle::Staged {
            version: Version::new("1.1.0"),
        };
        state.previous_version = Some(Version::new("0.9.0"));
        let resolved = roots.resolve(&state);
        assert_eq!(resolved.staging, Some(roots.staging(&Version::new("1.1.0"))));
        assert_eq!(resolved.backup, Some(roots.backup()));
    }
}
