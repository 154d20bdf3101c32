//! Recursive directory walker.
//!
//! Produces every non-directory entry below a root, in the order the
//! platform's directory listing returns them. Subdirectory contents are
//! spliced in at the position of the subdirectory (pre-order). Nothing is
//! filtered, sorted or deduplicated.

use crate::error::WalkError;
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Collect all file paths below `dir`.
///
/// Entries are classified by their own file type, so a symlink is emitted as
/// a file even when it points at a directory.
pub fn walk(dir: &Path) -> BoxFuture<'_, Result<Vec<PathBuf>, WalkError>> {
    async move {
        let read_dir_err = |source| WalkError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(read_dir_err)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
            let path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(ft) => ft,
                Err(source) => return Err(WalkError::EntryType { path, source }),
            };

            if file_type.is_dir() {
                files.extend(walk(&path).await?);
            } else {
                files.push(path);
            }
        }

        Ok(files)
    }
    .boxed()
}
