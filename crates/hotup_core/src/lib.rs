//! hotup_core - Web-content hot-update lifecycle core
//!
//! Lets a packaged application swap its bundled web content for a
//! newer, independently-downloaded version at runtime, and recover
//! automatically when the new content turns out to be broken:
//! - persisted update state with a tagged lifecycle (no illegal flag
//!   combinations)
//! - atomic content-root swap by rename, crash-recoverable at launch
//! - canary confirmation with automatic rollback and a permanent
//!   ignore list for versions that failed
//!
//! All operations are blocking; hosts call the long-running ones
//! (download, extraction) from a worker thread.

pub mod bridge;
pub mod checksum;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod fsops;
pub mod manager;
pub mod notify;
pub mod roots;
pub mod state;
pub mod version;

pub use bridge::{Bridge, BridgeResult};
pub use error::{ErrorPayload, Result, UpdateError};
pub use extract::{Extractor, ZipExtractor, INDEX_HTML};
pub use fetch::{CancelToken, FetchStatus, Fetcher, HttpFetcher};
pub use manager::{
    CanaryOutcome, CheckOutcome, ManagerConfig, StageOutcome, StageRequest, UpdateManager,
    VersionInfo,
};
pub use notify::{ContentSwitchNotifier, LoggingNotifier, NullNotifier};
pub use roots::ContentRoots;
pub use state::{Lifecycle, UpdateState};
pub use version::{compare, Version};
