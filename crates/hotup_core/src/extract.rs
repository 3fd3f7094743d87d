//! Update package extraction and content verification.
//!
//! Packages are ZIP archives carrying a `www` directory, either at the
//! top level or nested one directory down (build pipelines often wrap
//! the payload in a release folder). Extraction validates the ZIP
//! magic up front and refuses entries that would escape the
//! destination directory.

use crate::error::{Result, UpdateError};
use crate::roots::ACTIVE_DIR;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use zip::ZipArchive;

/// Entry file every content root must contain.
pub const INDEX_HTML: &str = "index.html";

// PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Unpacks a downloaded package into a destination directory.
pub trait Extractor: Send + Sync {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        if !is_zip_file(archive) {
            return Err(UpdateError::ExtractionFailed(
                "not a ZIP archive".into(),
            ));
        }

        let file =
            fs::File::open(archive).map_err(|e| UpdateError::ExtractionFailed(e.to_string()))?;
        let mut zip =
            ZipArchive::new(file).map_err(|e| UpdateError::ExtractionFailed(e.to_string()))?;

        fs::create_dir_all(dest).map_err(|e| UpdateError::TempDirError(e.to_string()))?;

        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| UpdateError::ExtractionFailed(e.to_string()))?;

            // mangled_name strips components that would escape dest.
            let rel = entry.mangled_name();
            if rel.as_os_str().is_empty() {
                continue;
            }
            let out = dest.join(&rel);

            if entry.name().ends_with('/') {
                fs::create_dir_all(&out).map_err(|e| UpdateError::ExtractionFailed(e.to_string()))?;
            } else {
                if let Some(parent) = out.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| UpdateError::ExtractionFailed(e.to_string()))?;
                }
                let mut target = fs::File::create(&out)
                    .map_err(|e| UpdateError::ExtractionFailed(e.to_string()))?;
                io::copy(&mut entry, &mut target)
                    .map_err(|e| UpdateError::ExtractionFailed(e.to_string()))?;
            }
        }

        debug!("extracted {} entries into {}", zip.len(), dest.display());
        Ok(())
    }
}

fn is_zip_file(path: &Path) -> bool {
    let mut header = [0u8; 4];
    match fs::File::open(path).and_then(|mut f| f.read_exact(&mut header)) {
        Ok(()) => header == ZIP_MAGIC,
        Err(e) => {
            error!("failed to read archive header: {e}");
            false
        }
    }
}

/// Locate the `www` directory in an extracted package: directly under
/// `dir`, or nested one level down.
pub fn find_content_root(dir: &Path) -> Option<PathBuf> {
    let direct = dir.join(ACTIVE_DIR);
    if direct.is_dir() {
        return Some(direct);
    }

    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        if entry.path().is_dir() {
            let nested = entry.path().join(ACTIVE_DIR);
            if nested.is_dir() {
                return Some(nested);
            }
        }
    }
    None
}

/// Check that a staged content root is servable: non-empty and
/// carrying the entry file.
pub fn verify_content_root(dir: &Path) -> Result<()> {
    if !crate::fsops::dir_non_empty(dir) {
        return Err(UpdateError::ExtractionFailed(
            "extracted content is empty".into(),
        ));
    }
    if !dir.join(INDEX_HTML).is_file() {
        return Err(UpdateError::ExtractionFailed(format!(
            "{INDEX_HTML} missing from update content"
        )));
    }
    Ok(())
}
