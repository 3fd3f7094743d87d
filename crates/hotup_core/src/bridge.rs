//! Host bridge surface.
//!
//! Thin JSON layer between the manager and the host UI bridge (the
//! embedder's script interface). Every operation returns either a
//! success payload or an `{"code", "message"}` error pair; nothing in
//! here mutates state on its own.

use crate::error::{ErrorPayload, UpdateError};
use crate::fetch::CancelToken;
use crate::manager::{CanaryOutcome, CheckOutcome, StageOutcome, StageRequest, UpdateManager};
use crate::version::Version;
use serde_json::{json, Value};
use std::sync::Arc;

pub type BridgeResult = Result<Value, ErrorPayload>;

pub struct Bridge {
    manager: Arc<UpdateManager>,
}

impl Bridge {
    pub fn new(manager: Arc<UpdateManager>) -> Self {
        Self { manager }
    }

    /// Dispatch a named action with JSON arguments, the shape the
    /// host's plugin layer speaks. Unknown actions are rejected the
    /// same way malformed requests are.
    pub fn dispatch(&self, action: &str, args: &Value) -> BridgeResult {
        match action {
            "getUpdate" => self.get_update(args, &CancelToken::new()),
            "forceUpdate" => self.force_update(),
            "canary" => self.canary(args),
            "checkForUpdate" => self.check_for_update(args),
            "getVersionInfo" => self.get_version_info(),
            "getIgnoreList" => self.get_ignore_list(),
            "getVersionHistory" => self.get_version_history(),
            "addIgnoredVersion" => self.add_ignored_version(args),
            "removeIgnoredVersion" => self.remove_ignored_version(args),
            "clearIgnoreList" => self.clear_ignore_list(),
            _ => Err(UpdateError::UpdateDataRequired(format!("unknown action: {action}")).into()),
        }
    }

    /// Download and stage an update described by `{url, version,
    /// sha256?}`.
    pub fn get_update(&self, args: &Value, cancel: &CancelToken) -> BridgeResult {
        if args.is_null() {
            return Err(UpdateError::UpdateDataRequired("update data is required".into()).into());
        }
        let req: StageRequest = serde_json::from_value(args.clone())
            .map_err(|e| UpdateError::UpdateDataRequired(format!("malformed update data: {e}")))?;

        let outcome = self.manager.download_and_stage(&req, cancel)?;
        Ok(json!({ "status": stage_status(outcome) }))
    }

    /// Activate the staged update immediately.
    pub fn force_update(&self) -> BridgeResult {
        let version = self.manager.install()?;
        Ok(json!({ "installedVersion": version }))
    }

    /// Report the canary verdict: `{version, success}`. `success`
    /// defaults to true so legacy callers that only confirm keep
    /// working. The version must name the pending activation; a
    /// verdict for any other version is rejected.
    pub fn canary(&self, args: &Value) -> BridgeResult {
        let version = required_version(args)?;
        let success = args.get("success").and_then(Value::as_bool).unwrap_or(true);

        let outcome = self.manager.canary_for(&version, success)?;
        Ok(json!({ "status": canary_status(&outcome) }))
    }

    /// Decide whether an advertised `{version}` should be fetched.
    pub fn check_for_update(&self, args: &Value) -> BridgeResult {
        let version = args.get("version").and_then(Value::as_str).unwrap_or("");
        if version.trim().is_empty() {
            return Err(UpdateError::VersionRequired.into());
        }

        let outcome = self.manager.check_available(&Version::new(version));
        let status = match outcome {
            CheckOutcome::UpToDate => "upToDate",
            CheckOutcome::Ignored => "ignored",
            CheckOutcome::Available => "available",
        };
        Ok(json!({ "status": status }))
    }

    pub fn get_version_info(&self) -> BridgeResult {
        let info = self.manager.version_info();
        serde_json::to_value(&info)
            .map_err(|e| UpdateError::UpdateDataRequired(e.to_string()).into())
    }

    pub fn get_ignore_list(&self) -> BridgeResult {
        Ok(json!({ "versions": self.manager.ignored_versions() }))
    }

    pub fn get_version_history(&self) -> BridgeResult {
        Ok(json!({ "versions": self.manager.version_history() }))
    }

    // Debug-only surface.

    pub fn add_ignored_version(&self, args: &Value) -> BridgeResult {
        let version = required_version(args)?;
        self.manager.ignore_add(&version)?;
        Ok(json!({ "versions": self.manager.ignored_versions() }))
    }

    pub fn remove_ignored_version(&self, args: &Value) -> BridgeResult {
        let version = required_version(args)?;
        let removed = self.manager.ignore_remove(&version)?;
        Ok(json!({
            "removed": removed,
            "versions": self.manager.ignored_versions(),
        }))
    }

    pub fn clear_ignore_list(&self) -> BridgeResult {
        self.manager.ignore_clear()?;
        Ok(json!({ "versions": [] }))
    }
}

fn required_version(args: &Value) -> Result<Version, ErrorPayload> {
    let version = args.get("version").and_then(Value::as_str).unwrap_or("");
    if version.trim().is_empty() {
        return Err(UpdateError::VersionRequired.into());
    }
    Ok(Version::new(version))
}

fn stage_status(outcome: StageOutcome) -> &'static str {
    match outcome {
        StageOutcome::Staged => "staged",
        StageOutcome::AlreadyInstalled => "alreadyInstalled",
        StageOutcome::AlreadyStaged => "alreadyStaged",
        StageOutcome::NotNewer => "notNewer",
        StageOutcome::Ignored => "ignored",
        StageOutcome::Cancelled => "cancelled",
    }
}

fn canary_status(outcome: &CanaryOutcome) -> &'static str {
    match outcome {
        CanaryOutcome::Committed => "committed",
        CanaryOutcome::RolledBack { .. } => "rolledBack",
        CanaryOutcome::NoCanaryPending => "noCanaryPending",
        CanaryOutcome::RollbackUnavailable => "rollbackUnavailable",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as CoreResult;
    use crate::extract::ZipExtractor;
    use crate::fetch::{FetchStatus, Fetcher};
    use crate::manager::ManagerConfig;
    use crate::notify::NullNotifier;
    use std::path::Path;
    use tempfile::TempDir;

    struct NoFetcher;

    impl Fetcher for NoFetcher {
        fn fetch(
            &self,
            _url: &str,
            _dest: &Path,
            _cancel: &CancelToken,
        ) -> CoreResult<FetchStatus> {
            panic!("fetcher must not be invoked");
        }
    }

    fn bridge(temp: &TempDir) -> Bridge {
        let manager = UpdateManager::open(
            ManagerConfig {
                base_dir: temp.path().join("data"),
                bundle_version: Version::new("1.0.0"),
                bundle_content: None,
            },
            Box::new(NoFetcher),
            Box::new(ZipExtractor::new()),
            Box::new(NullNotifier),
        )
        .unwrap();
        Bridge::new(Arc::new(manager))
    }

    #[test]
    fn test_get_update_requires_data() {
        let temp = TempDir::new().unwrap();
        let err = bridge(&temp)
            .dispatch("getUpdate", &Value::Null)
            .unwrap_err();
        assert_eq!(err.code, "UPDATE_DATA_REQUIRED");
    }

    #[test]
    fn test_canary_requires_version() {
        let temp = TempDir::new().unwrap();
        let err = bridge(&temp).dispatch("canary", &json!({})).unwrap_err();
        assert_eq!(err.code, "VERSION_REQUIRED");
    }

    #[test]
    fn test_canary_verdict_must_name_pending_version() {
        use crate::state::{Lifecycle, UpdateState, STATE_FILE_NAME};
        use std::fs;

        let temp = TempDir::new().unwrap();
        let base = temp.path().join("data");
        fs::create_dir_all(&base).unwrap();
        let mut state = UpdateState::first_launch(&Version::new("1.1.0"));
        state.previous_version = Some(Version::new("1.0.0"));
        state.lifecycle = Lifecycle::CanaryPending {
            version: Version::new("1.1.0"),
        };
        state.save(&base.join(STATE_FILE_NAME)).unwrap();

        let bridge = bridge(&temp);

        let err = bridge
            .dispatch("canary", &json!({"version": "9.9.9"}))
            .unwrap_err();
        assert_eq!(err.code, "UPDATE_DATA_REQUIRED");

        // The pending canary is untouched by the rejected verdict.
        let info = bridge.dispatch("getVersionInfo", &Value::Null).unwrap();
        assert_eq!(info["canaryVersion"], "1.1.0");

        let res = bridge
            .dispatch("canary", &json!({"version": "1.1.0", "success": true}))
            .unwrap();
        assert_eq!(res["status"], "committed");
    }

    #[test]
    fn test_force_update_without_staging() {
        let temp = TempDir::new().unwrap();
        let err = bridge(&temp)
            .dispatch("forceUpdate", &Value::Null)
            .unwrap_err();
        assert_eq!(err.code, "NO_UPDATE_READY");
    }

    #[test]
    fn test_version_info_payload_shape() {
        let temp = TempDir::new().unwrap();
        let info = bridge(&temp).dispatch("getVersionInfo", &Value::Null).unwrap();
        assert_eq!(info["installedVersion"], "1.0.0");
        assert_eq!(info["appBundleVersion"], "1.0.0");
        assert_eq!(info["previousVersion"], Value::Null);
        assert_eq!(info["hasPendingUpdate"], false);
        assert!(info["ignoreList"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_ignore_list_roundtrip() {
        let temp = TempDir::new().unwrap();
        let bridge = bridge(&temp);

        bridge
            .dispatch("addIgnoredVersion", &json!({"version": "1.5.0"}))
            .unwrap();
        let list = bridge.dispatch("getIgnoreList", &Value::Null).unwrap();
        assert_eq!(list["versions"], json!(["1.5.0"]));

        let removed = bridge
            .dispatch("removeIgnoredVersion", &json!({"version": "1.5.0"}))
            .unwrap();
        assert_eq!(removed["removed"], true);

        let list = bridge.dispatch("getIgnoreList", &Value::Null).unwrap();
        assert!(list["versions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_action_rejected() {
        let temp = TempDir::new().unwrap();
        let err = bridge(&temp).dispatch("selfDestruct", &Value::Null).unwrap_err();
        assert_eq!(err.code, "UPDATE_DATA_REQUIRED");
    }

    #[test]
    fn test_check_for_update() {
        let temp = TempDir::new().unwrap();
        let bridge = bridge(&temp);

        let res = bridge
            .dispatch("checkForUpdate", &json!({"version": "2.0.0"}))
            .unwrap();
        assert_eq!(res["status"], "available");

        let res = bridge
            .dispatch("checkForUpdate", &json!({"version": "0.5.0"}))
            .unwrap();
        assert_eq!(res["status"], "upToDate");
    }
}
