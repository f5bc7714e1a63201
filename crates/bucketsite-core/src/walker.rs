//! Recursive enumeration of the build directory.
//!
//! The walk is depth-first with entries of each directory visited in
//! file-name order, so repeated listings of an unchanged tree are identical.
//! The first unreadable entry aborts the whole listing.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{SiteError, SiteResult};
use crate::types::FileUploadTask;

/// List every regular file reachable from `root`.
///
/// Symlinks are followed; a symlink loop is reported as an error.
/// Directories themselves are never returned.
pub fn list_files(root: &Path) -> SiteResult<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| SiteError::Filesystem {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;
    if !metadata.is_dir() {
        return Err(SiteError::Filesystem {
            path: root.to_path_buf(),
            message: "not a directory".to_owned(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| SiteError::Filesystem {
            path: e
                .path()
                .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "listed build directory");
    Ok(files)
}

/// List the files under `root` paired with their object keys.
pub fn upload_tasks(root: &Path, key_prefix: Option<&str>) -> SiteResult<Vec<FileUploadTask>> {
    list_files(root)?
        .into_iter()
        .map(|path| FileUploadTask::new(root, path, key_prefix))
        .collect()
}
