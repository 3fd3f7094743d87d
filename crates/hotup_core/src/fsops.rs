//! Filesystem helpers for the updater.
//!
//! The active root is always swapped by rename; these helpers cover
//! the remaining plumbing: recursive copy for bundle seeding, scratch
//! directories with guaranteed cleanup, and the small checks the
//! manager runs before trusting a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use walkdir::WalkDir;

/// True if the path is a directory containing at least one entry.
pub fn dir_non_empty(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Remove a directory tree if it exists; missing is not an error.
pub fn remove_dir_all_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Recursively copy a directory tree.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Scratch directory that is removed on every exit path, including
/// errors and panics, via Drop. Staging work happens in here so a
/// failed download or extraction never leaves partial artifacts
/// behind.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a uniquely named scratch dir under `parent`.
    pub fn create(parent: &Path) -> io::Result<Self> {
        let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = parent.join(format!("scratch-{}-{}", std::process::id(), n));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = remove_dir_all_if_exists(&self.path) {
            warn!("failed to clean scratch dir {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dir_non_empty() {
        let temp = TempDir::new().unwrap();
        assert!(!dir_non_empty(temp.path()));
        assert!(!dir_non_empty(&temp.path().join("missing")));
        fs::write(temp.path().join("a.txt"), "x").unwrap();
        assert!(dir_non_empty(temp.path()));
    }

    #[test]
    fn test_copy_dir_recursive() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("index.html"), "<html>").unwrap();
        fs::write(src.join("sub/app.js"), "void 0").unwrap();

        let dst = temp.path().join("dst");
        copy_dir(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("index.html")).unwrap(), "<html>");
        assert_eq!(fs::read_to_string(dst.join("sub/app.js")).unwrap(), "void 0");
    }

    #[test]
    fn test_scratch_dir_cleanup_on_drop() {
        let temp = TempDir::new().unwrap();
        let kept;
        {
            let scratch = ScratchDir::create(temp.path()).unwrap();
            kept = scratch.path().to_path_buf();
            fs::write(scratch.path().join("partial.zip"), "junk").unwrap();
            assert!(kept.exists());
        }
        assert!(!kept.exists());
    }

    #[test]
    fn test_remove_if_exists_tolerates_missing() {
        let temp = TempDir::new().unwrap();
        remove_dir_all_if_exists(&temp.path().join("nothing")).unwrap();
    }
}
