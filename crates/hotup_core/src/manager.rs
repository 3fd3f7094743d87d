//! Update lifecycle manager.
//!
//! Orchestrates check → stage → activate → canary → commit/rollback
//! over the persisted state and the content roots. Guarantees, across
//! process restarts and crashes during install:
//! - the active content root is never missing or partially written;
//! - activation is a filesystem rename, performed before the state
//!   commit, so a crash mid-install is recoverable at next launch;
//! - a version that fails its canary is permanently ignore-listed and
//!   the previous root is restored byte-for-byte.
//!
//! All state mutation is serialized through one mutex. Long-running
//! work (download, extraction) belongs on a worker thread; the manager
//! itself only blocks on the state file and directory renames.

use crate::checksum;
use crate::error::{Result, UpdateError};
use crate::extract::{self, Extractor};
use crate::fetch::{CancelToken, FetchStatus, Fetcher};
use crate::fsops::{self, ScratchDir};
use crate::notify::ContentSwitchNotifier;
use crate::roots::ContentRoots;
use crate::state::{Lifecycle, UpdateState};
use crate::version::{is_newer, Version};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

/// Everything the manager needs to know about its host.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Base directory owning the content roots and the state file.
    pub base_dir: PathBuf,
    /// Version string baked into the application package.
    pub bundle_version: Version,
    /// Bundled content used to seed the active root on first launch.
    pub bundle_content: Option<PathBuf>,
}

/// What a fetched update descriptor asks the manager to stage.
#[derive(Debug, Clone, Deserialize)]
pub struct StageRequest {
    pub url: String,
    pub version: Version,
    /// Expected SHA-256 of the package, verified when present.
    #[serde(default)]
    pub sha256: Option<String>,
}

/// Decision for an advertised remote version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Remote is not newer than what is installed.
    UpToDate,
    /// Remote previously failed canary and is denylisted.
    Ignored,
    /// Remote should be downloaded and staged.
    Available,
}

/// Result of a download-and-stage call that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Staged,
    AlreadyInstalled,
    AlreadyStaged,
    NotNewer,
    Ignored,
    Cancelled,
}

/// Result of a canary verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum CanaryOutcome {
    Committed,
    RolledBack { to: Version },
    /// No activation is awaiting confirmation.
    NoCanaryPending,
    /// Rollback was requested but there is nothing to roll back to
    /// (fresh install, or the previous version equals the current).
    RollbackUnavailable,
}

/// Read-only snapshot surfaced to the host, in the bridge's wire
/// shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub app_bundle_version: Version,
    pub installed_version: Version,
    pub previous_version: Option<Version>,
    pub pending_version: Option<Version>,
    pub canary_version: Option<Version>,
    pub has_pending_update: bool,
    pub pending_update_ready: bool,
    pub download_in_progress: bool,
    pub ignore_list: Vec<Version>,
}

pub struct UpdateManager {
    roots: ContentRoots,
    bundle_version: Version,
    state: Mutex<UpdateState>,
    /// Fast-path mutual exclusion for stagings, checked before the
    /// state lock so callers get immediate feedback.
    downloading: AtomicBool,
    fetcher: Box<dyn Fetcher>,
    extractor: Box<dyn Extractor>,
    notifier: Box<dyn ContentSwitchNotifier>,
}

/// Clears the download flag on every exit path.
struct DownloadFlagGuard<'a>(&'a AtomicBool);

impl Drop for DownloadFlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UpdateManager {
    /// Open the manager: load (or initialize) the state, seed the
    /// active root from the bundle if needed, and run launch recovery.
    pub fn open(
        config: ManagerConfig,
        fetcher: Box<dyn Fetcher>,
        extractor: Box<dyn Extractor>,
        notifier: Box<dyn ContentSwitchNotifier>,
    ) -> Result<Self> {
        let roots = ContentRoots::new(&config.base_dir);
        fs::create_dir_all(roots.base())
            .map_err(|e| UpdateError::TempDirError(e.to_string()))?;

        let mut state = UpdateState::load(&roots.state_file(), &config.bundle_version);

        // First launch: materialize the active root from the bundled
        // content so there is always something to serve.
        let active = roots.active();
        if !active.exists() {
            if let Some(seed) = &config.bundle_content {
                info!("seeding active root from bundle at {}", seed.display());
                fsops::copy_dir(seed, &active)
                    .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
            }
        }

        Self::persist(&mut state, &roots.state_file())?;

        let manager = Self {
            roots,
            bundle_version: config.bundle_version,
            state: Mutex::new(state),
            downloading: AtomicBool::new(false),
            fetcher,
            extractor,
            notifier,
        };
        manager.launch_recovery();
        Ok(manager)
    }

    /// Decide whether an advertised remote version should be fetched.
    /// Never touches the network; the host's scheduler drives this on
    /// whatever interval it likes.
    pub fn check_available(&self, remote: &Version) -> CheckOutcome {
        let state = self.lock_state();
        if state.ignore_list.contains(remote) {
            info!("version {remote} is ignore-listed, skipping");
            return CheckOutcome::Ignored;
        }
        if !is_newer(remote, &state.installed_version) {
            return CheckOutcome::UpToDate;
        }
        CheckOutcome::Available
    }

    /// Download, verify, and stage an update. Blocking; call from a
    /// worker thread. The update is left pending until `install` (or
    /// the next launch recovery) activates it.
    pub fn download_and_stage(
        &self,
        req: &StageRequest,
        cancel: &CancelToken,
    ) -> Result<StageOutcome> {
        if req.url.trim().is_empty() {
            return Err(UpdateError::UrlRequired);
        }
        if req.version.is_empty() {
            return Err(UpdateError::VersionRequired);
        }

        if self
            .downloading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(UpdateError::DownloadInProgress);
        }
        let _flag = DownloadFlagGuard(&self.downloading);

        {
            let mut state = self.lock_state();
            if state.installed_version == req.version {
                info!("version {} already installed, skipping", req.version);
                return Ok(StageOutcome::AlreadyInstalled);
            }
            if state.ignore_list.contains(&req.version) {
                warn!("refusing ignore-listed version {}", req.version);
                return Ok(StageOutcome::Ignored);
            }
            if !is_newer(&req.version, &state.installed_version) {
                return Ok(StageOutcome::NotNewer);
            }
            if let Lifecycle::Staged { version } = &state.lifecycle {
                if *version == req.version && fsops::dir_non_empty(&self.roots.staging(version)) {
                    info!("version {} already staged, skipping", req.version);
                    return Ok(StageOutcome::AlreadyStaged);
                }
            }

            state.lifecycle = Lifecycle::Downloading {
                version: req.version.clone(),
                url: req.url.clone(),
            };
            if let Err(e) = Self::persist(&mut state, &self.roots.state_file()) {
                state.lifecycle = Lifecycle::Idle;
                return Err(e);
            }
        }

        let staged = self.stage_inner(req, cancel);

        let mut state = self.lock_state();
        match staged {
            Ok(FetchStatus::Completed) => {
                state.lifecycle = Lifecycle::Staged {
                    version: req.version.clone(),
                };
                Self::persist(&mut state, &self.roots.state_file())?;
                info!("update {} staged and ready to install", req.version);
                Ok(StageOutcome::Staged)
            }
            Ok(FetchStatus::Cancelled) => {
                state.lifecycle = Lifecycle::Idle;
                self.persist_best_effort(&mut state);
                Ok(StageOutcome::Cancelled)
            }
            Err(e) => {
                // Transient: back to Idle, retryable, never
                // ignore-listed.
                state.lifecycle = Lifecycle::Idle;
                self.persist_best_effort(&mut state);
                warn!("staging of {} failed: {e}", req.version);
                Err(e)
            }
        }
    }

    /// Fetch + extract + verify into the per-version staging dir.
    /// All intermediate artifacts live in a scratch dir that is
    /// cleaned up on every exit path.
    fn stage_inner(&self, req: &StageRequest, cancel: &CancelToken) -> Result<FetchStatus> {
        fs::create_dir_all(self.roots.tmp())
            .map_err(|e| UpdateError::TempDirError(e.to_string()))?;
        let scratch = ScratchDir::create(&self.roots.tmp())
            .map_err(|e| UpdateError::TempDirError(e.to_string()))?;

        let archive = scratch.path().join("update.zip");
        if self.fetcher.fetch(&req.url, &archive, cancel)? == FetchStatus::Cancelled {
            return Ok(FetchStatus::Cancelled);
        }

        if let Some(expected) = &req.sha256 {
            checksum::verify_archive(&archive, expected)?;
        }
        if cancel.is_cancelled() {
            return Ok(FetchStatus::Cancelled);
        }

        let unpacked = scratch.path().join("unpacked");
        self.extractor.extract(&archive, &unpacked)?;

        let content = extract::find_content_root(&unpacked).ok_or(UpdateError::WwwNotFound)?;
        extract::verify_content_root(&content)?;

        if cancel.is_cancelled() {
            return Ok(FetchStatus::Cancelled);
        }

        // Scratch lives under the same base dir, so this is a rename,
        // not a copy: the staging dir appears atomically.
        let staging = self.roots.staging(&req.version);
        fsops::remove_dir_all_if_exists(&staging)
            .map_err(|e| UpdateError::TempDirError(e.to_string()))?;
        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent).map_err(|e| UpdateError::TempDirError(e.to_string()))?;
        }
        fs::rename(&content, &staging).map_err(|e| {
            UpdateError::TempDirError(format!("failed to move staged content: {e}"))
        })?;

        Ok(FetchStatus::Completed)
    }

    /// Activate the staged update: swap the content roots, commit the
    /// state, notify the host, and await the canary verdict.
    pub fn install(&self) -> Result<Version> {
        let mut state = self.lock_state();
        self.install_locked(&mut state)
    }

    fn install_locked(&self, state: &mut UpdateState) -> Result<Version> {
        let version = match &state.lifecycle {
            Lifecycle::Staged { version } => version.clone(),
            _ => return Err(UpdateError::NoUpdateReady),
        };

        let staging = self.roots.staging(&version);
        if !fsops::dir_non_empty(&staging) {
            warn!("staged files for {version} are missing, discarding");
            state.lifecycle = Lifecycle::Idle;
            self.persist_best_effort(state);
            return Err(UpdateError::UpdateFilesNotFound);
        }

        info!(
            "installing {} over {}",
            version, state.installed_version
        );

        let active = self.roots.active();
        let backup = self.roots.backup();

        // Filesystem swap first, state commit second: a crash in here
        // leaves the pre-swap record, and launch recovery re-runs the
        // install from the still-present staging dir.
        fsops::remove_dir_all_if_exists(&backup)
            .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
        let had_active = active.exists();
        if had_active {
            fs::rename(&active, &backup)
                .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
        }
        if let Err(e) = fs::rename(&staging, &active) {
            // Put the old root back; the pre-install state is intact.
            if had_active && !active.exists() {
                if let Err(restore) = fs::rename(&backup, &active) {
                    error!("failed to restore active root: {restore}");
                }
            }
            return Err(UpdateError::InstallFailed(e.to_string()));
        }

        state.previous_version = Some(state.installed_version.clone());
        state.installed_version = version.clone();
        state.lifecycle = Lifecycle::CanaryPending {
            version: version.clone(),
        };
        if !state.version_history.contains(&version) {
            state.version_history.push(version.clone());
        }
        Self::persist(state, &self.roots.state_file())?;

        info!("update {version} activated, awaiting canary");
        self.notifier.content_switched(&active);
        Ok(version)
    }

    /// Record the host's canary verdict for the just-activated
    /// version. Success commits the update and drops the rollback
    /// target; failure permanently ignore-lists the version and
    /// restores the previous root.
    pub fn canary(&self, success: bool) -> Result<CanaryOutcome> {
        let state = self.lock_state();
        self.canary_locked(state, success)
    }

    /// Like `canary`, but refuses a verdict that names a different
    /// version than the one awaiting confirmation, so a stale caller
    /// cannot commit or roll back the wrong activation.
    pub fn canary_for(&self, version: &Version, success: bool) -> Result<CanaryOutcome> {
        let state = self.lock_state();
        match state.canary_version() {
            Some(pending) if pending == version => {}
            Some(pending) => {
                return Err(UpdateError::UpdateDataRequired(format!(
                    "canary pending for {pending}, not {version}"
                )));
            }
            None => return Ok(CanaryOutcome::NoCanaryPending),
        }
        self.canary_locked(state, success)
    }

    fn canary_locked(
        &self,
        mut state: MutexGuard<'_, UpdateState>,
        success: bool,
    ) -> Result<CanaryOutcome> {
        let version = match state.canary_version() {
            Some(v) => v.clone(),
            None => return Ok(CanaryOutcome::NoCanaryPending),
        };

        if success {
            state.lifecycle = Lifecycle::Idle;
            state.previous_version = None;
            Self::persist(&mut state, &self.roots.state_file())?;

            // The rollback target is no longer needed.
            if let Err(e) = fsops::remove_dir_all_if_exists(&self.roots.backup()) {
                warn!("failed to remove backup root: {e}");
            }
            if let Err(e) = fsops::remove_dir_all_if_exists(&self.roots.staging_root()) {
                warn!("failed to clean staging dir: {e}");
            }
            info!("canary confirmed for {version}, update committed");
            return Ok(CanaryOutcome::Committed);
        }

        let previous = match &state.previous_version {
            Some(p) => p.clone(),
            None => {
                // Fresh install from the store; nothing to roll back
                // to, stay on the current content.
                warn!("canary failed for {version} but no rollback target exists");
                state.lifecycle = Lifecycle::Idle;
                self.persist_best_effort(&mut state);
                return Ok(CanaryOutcome::RollbackUnavailable);
            }
        };

        if previous == version {
            warn!("refusing rollback from {version} to itself");
            state.lifecycle = Lifecycle::Idle;
            state.previous_version = None;
            self.persist_best_effort(&mut state);
            return Ok(CanaryOutcome::RollbackUnavailable);
        }

        let backup = self.roots.backup();
        if !fsops::dir_non_empty(&backup) {
            state.lifecycle = Lifecycle::Idle;
            state.previous_version = None;
            self.persist_best_effort(&mut state);
            return Err(UpdateError::InstallFailed(
                "previous version files not found".into(),
            ));
        }

        warn!("canary failed, rolling back {version} -> {previous}");

        // Swap the failed root out through a transient hold dir, then
        // bring the backup in by rename.
        let active = self.roots.active();
        let hold = self.roots.rollback_hold();
        fsops::remove_dir_all_if_exists(&hold)
            .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
        let had_active = active.exists();
        if had_active {
            fs::rename(&active, &hold)
                .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
        }
        if let Err(e) = fs::rename(&backup, &active) {
            if had_active && !active.exists() {
                if let Err(restore) = fs::rename(&hold, &active) {
                    error!("failed to restore active root: {restore}");
                }
            }
            return Err(UpdateError::InstallFailed(e.to_string()));
        }

        state.ignore_list.insert(version.clone());
        state.version_history.retain(|v| v != &version);
        state.installed_version = previous.clone();
        state.previous_version = None;
        state.lifecycle = Lifecycle::Idle;
        Self::persist(&mut state, &self.roots.state_file())?;

        // The failed version's files are dead weight now.
        if let Err(e) = fsops::remove_dir_all_if_exists(&hold) {
            warn!("failed to remove rolled-back root: {e}");
        }

        info!("rollback complete, {version} added to ignore list");
        self.notifier.content_switched(&active);
        Ok(CanaryOutcome::RolledBack { to: previous })
    }

    /// Run once at open. Completes an install the previous process
    /// staged but never activated, discards half-finished downloads,
    /// and preserves an unanswered canary so the host can make a
    /// fresh decision.
    fn launch_recovery(&self) {
        let mut state = self.lock_state();
        match state.lifecycle.clone() {
            Lifecycle::Idle => {}
            Lifecycle::Downloading { version, .. } => {
                // self_heal normally catches this at load; kept for
                // state handed over in tests or by embedders.
                info!("discarding interrupted download of {version}");
                state.lifecycle = Lifecycle::Idle;
                self.persist_best_effort(&mut state);
            }
            Lifecycle::Staged { version } => {
                if fsops::dir_non_empty(&self.roots.staging(&version)) {
                    info!("completing unapplied install of {version}");
                    if let Err(e) = self.install_locked(&mut state) {
                        // Leave the staging in place; an explicit
                        // install can retry.
                        warn!("deferred install of {version} failed: {e}");
                    }
                } else {
                    warn!("staged files for {version} vanished, resetting");
                    state.lifecycle = Lifecycle::Idle;
                    self.persist_best_effort(&mut state);
                }
            }
            Lifecycle::CanaryPending { version } => {
                info!("canary for {version} still unanswered, awaiting verdict");
            }
        }
    }

    // ------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------

    pub fn version_info(&self) -> VersionInfo {
        let state = self.lock_state();
        VersionInfo {
            app_bundle_version: self.bundle_version.clone(),
            installed_version: state.installed_version.clone(),
            previous_version: state.previous_version.clone(),
            pending_version: state.pending_version().cloned(),
            canary_version: state.canary_version().cloned(),
            has_pending_update: state.has_pending_update(),
            pending_update_ready: state.pending_update_ready(),
            download_in_progress: self.downloading.load(Ordering::SeqCst),
            ignore_list: state.ignore_list.iter().cloned().collect(),
        }
    }

    pub fn ignored_versions(&self) -> Vec<Version> {
        self.lock_state().ignore_list.iter().cloned().collect()
    }

    pub fn version_history(&self) -> Vec<Version> {
        self.lock_state().version_history.clone()
    }

    pub fn active_root(&self) -> PathBuf {
        self.roots.active()
    }

    /// Clone of the current state, for diagnostics.
    pub fn state_snapshot(&self) -> UpdateState {
        self.lock_state().clone()
    }

    // ------------------------------------------------------------
    // Debug-only ignore list surface
    // ------------------------------------------------------------

    /// Manually denylist a version. The installed version cannot be
    /// ignored.
    pub fn ignore_add(&self, version: &Version) -> Result<()> {
        if version.is_empty() {
            return Err(UpdateError::VersionRequired);
        }
        let mut state = self.lock_state();
        if *version == state.installed_version {
            return Err(UpdateError::UpdateDataRequired(
                "cannot ignore the installed version".into(),
            ));
        }
        if state.ignore_list.insert(version.clone()) {
            // Drop a staged copy of the now-ignored version.
            if state.pending_version() == Some(version) {
                state.lifecycle = Lifecycle::Idle;
            }
            Self::persist(&mut state, &self.roots.state_file())?;
        }
        Ok(())
    }

    /// Remove a version from the denylist. It becomes eligible again
    /// only on the next explicit check; nothing is re-downloaded
    /// automatically.
    pub fn ignore_remove(&self, version: &Version) -> Result<bool> {
        let mut state = self.lock_state();
        let removed = state.ignore_list.remove(version);
        if removed {
            Self::persist(&mut state, &self.roots.state_file())?;
        }
        Ok(removed)
    }

    pub fn ignore_clear(&self) -> Result<()> {
        let mut state = self.lock_state();
        if !state.ignore_list.is_empty() {
            state.ignore_list.clear();
            Self::persist(&mut state, &self.roots.state_file())?;
        }
        Ok(())
    }

    // ------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------

    fn lock_state(&self) -> MutexGuard<'_, UpdateState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(state: &mut UpdateState, path: &Path) -> Result<()> {
        state.save(path).map_err(|e| {
            UpdateError::InstallFailed(format!("failed to persist update state: {e}"))
        })
    }

    fn persist_best_effort(&self, state: &mut UpdateState) {
        if let Err(e) = state.save(&self.roots.state_file()) {
            error!("failed to persist update state: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ZipExtractor;
    use crate::notify::NullNotifier;
    use tempfile::TempDir;

    struct NoFetcher;

    impl Fetcher for NoFetcher {
        fn fetch(&self, _url: &str, _dest: &Path, _cancel: &CancelToken) -> Result<FetchStatus> {
            panic!("fetcher must not be invoked");
        }
    }

    fn manager(temp: &TempDir) -> UpdateManager {
        UpdateManager::open(
            ManagerConfig {
                base_dir: temp.path().join("data"),
                bundle_version: Version::new("1.0.0"),
                bundle_content: None,
            },
            Box::new(NoFetcher),
            Box::new(ZipExtractor::new()),
            Box::new(NullNotifier),
        )
        .unwrap()
    }

    #[test]
    fn test_check_available_decisions() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        assert_eq!(
            mgr.check_available(&Version::new("1.0.0")),
            CheckOutcome::UpToDate
        );
        assert_eq!(
            mgr.check_available(&Version::new("0.9.0")),
            CheckOutcome::UpToDate
        );
        assert_eq!(
            mgr.check_available(&Version::new("1.1.0")),
            CheckOutcome::Available
        );

        mgr.ignore_add(&Version::new("1.1.0")).unwrap();
        assert_eq!(
            mgr.check_available(&Version::new("1.1.0")),
            CheckOutcome::Ignored
        );
    }

    #[test]
    fn test_install_without_staging_fails() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let err = mgr.install().unwrap_err();
        assert_eq!(err.code(), "NO_UPDATE_READY");
    }

    #[test]
    fn test_canary_without_activation_is_noop() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        assert_eq!(mgr.canary(true).unwrap(), CanaryOutcome::NoCanaryPending);
        assert_eq!(mgr.canary(false).unwrap(), CanaryOutcome::NoCanaryPending);
    }

    #[test]
    fn test_stage_request_validation() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let cancel = CancelToken::new();

        let err = mgr
            .download_and_stage(
                &StageRequest {
                    url: "".into(),
                    version: Version::new("2.0.0"),
                    sha256: None,
                },
                &cancel,
            )
            .unwrap_err();
        assert_eq!(err.code(), "URL_REQUIRED");

        let err = mgr
            .download_and_stage(
                &StageRequest {
                    url: "https://example.com/u.zip".into(),
                    version: Version::new(""),
                    sha256: None,
                },
                &cancel,
            )
            .unwrap_err();
        assert_eq!(err.code(), "VERSION_REQUIRED");
    }

    #[test]
    fn test_ignore_add_rejects_installed_version() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let err = mgr.ignore_add(&Version::new("1.0.0")).unwrap_err();
        assert_eq!(err.code(), "UPDATE_DATA_REQUIRED");
    }

    #[test]
    fn test_ignore_remove_and_clear() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        mgr.ignore_add(&Version::new("1.1.0")).unwrap();
        mgr.ignore_add(&Version::new("1.2.0")).unwrap();
        assert_eq!(mgr.ignored_versions().len(), 2);

        assert!(mgr.ignore_remove(&Version::new("1.1.0")).unwrap());
        assert!(!mgr.ignore_remove(&Version::new("1.1.0")).unwrap());

        mgr.ignore_clear().unwrap();
        assert!(mgr.ignored_versions().is_empty());
    }

    #[test]
    fn test_bundle_seeding() {
        let temp = TempDir::new().unwrap();
        let seed = temp.path().join("bundle_www");
        fs::create_dir_all(&seed).unwrap();
        fs::write(seed.join("index.html"), "<html>bundled</html>").unwrap();

        let mgr = UpdateManager::open(
            ManagerConfig {
                base_dir: temp.path().join("data"),
                bundle_version: Version::new("1.0.0"),
                bundle_content: Some(seed),
            },
            Box::new(NoFetcher),
            Box::new(ZipExtractor::new()),
            Box::new(NullNotifier),
        )
        .unwrap();

        let index = mgr.active_root().join("index.html");
        assert_eq!(fs::read_to_string(index).unwrap(), "<html>bundled</html>");
    }
}
