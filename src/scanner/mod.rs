//! Image discovery.
//!
//! Walks a root directory and produces the ordered file list the engine
//! scores. The list is sorted by path, so repeated runs over the same
//! tree count, score, and report images in the same order.

mod error;


pub use error::ScanError;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::SUPPORTED_EXTENSIONS;

/// Returns `true` if `path` has a supported image extension.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|candidate| *candidate == lower)
        })
        .unwrap_or(false)
}

/// Enumerates image files under `root`.
///
/// Non-recursive mode inspects direct children only. Entries that cannot
/// be read mid-walk are logged and skipped rather than aborting the
/// enumeration. An empty `Ok` list means the directory holds no
/// supported images; only a missing or non-directory root is an error.
pub fn discover_images(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() && has_supported_extension(entry.path()) => {
                Some(entry.into_path())
            }
            Ok(_) => None,
            Err(error) => {
                warn!(error = %error, "skipping unreadable entry during scan");
                None
            }
        })
        .collect();

    files.sort();

    if files.is_empty() {
        warn!(root = %root.display(), "no image files found");
    } else {
        debug!(
            root = %root.display(),
            count = files.len(),
            recursive,
            "image discovery complete"
        );
    }

    Ok(files)
}
