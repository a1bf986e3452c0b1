//! Moving files into category directories.
//!
//! This module resolves collision-free destination names and relocates files
//! into category subdirectories of a base directory. It never overwrites an
//! existing entry: when the name is taken, a numeric suffix is inserted
//! before the extension.

use crate::category::split_file_name;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while moving a single file.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for move operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Returns `file_name` if nothing named that exists in `destination_dir`,
/// otherwise the first `base_N.ext` (N = 1, 2, ...) that is free.
///
/// Every candidate is checked against the filesystem; nothing is cached, so
/// the answer reflects the directory at the moment of the call. Not safe
/// against concurrent writers to the same directory.
///
/// # Examples
///
/// ```
/// use folder_cleaner::mover::unique_name;
/// use std::fs;
///
/// let dir = tempfile::tempdir().unwrap();
/// assert_eq!(unique_name(dir.path(), "a.txt"), "a.txt");
///
/// fs::write(dir.path().join("a.txt"), "").unwrap();
/// assert_eq!(unique_name(dir.path(), "a.txt"), "a_1.txt");
/// ```
pub fn unique_name(destination_dir: &Path, file_name: &str) -> String {
    if !entry_exists(&destination_dir.join(file_name)) {
        return file_name.to_string();
    }

    let (base, ext) = split_file_name(file_name);
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{}_{}{}", base, counter, ext);
        if !entry_exists(&destination_dir.join(&candidate)) {
            return candidate;
        }
        counter += 1;
    }
}

/// Picks the destination name for an entry whose raw name may not be UTF-8.
///
/// The raw name is kept when it is free; otherwise the collision suffix is
/// derived from the lossy display form.
pub(crate) fn destination_name(destination_dir: &Path, raw_name: &OsStr) -> PathBuf {
    if !entry_exists(&destination_dir.join(raw_name)) {
        return PathBuf::from(raw_name);
    }
    PathBuf::from(unique_name(destination_dir, &raw_name.to_string_lossy()))
}

/// Creates `base/category` if it does not exist yet and returns its path.
///
/// Calling this for a directory that already exists is a no-op.
pub fn ensure_category_dir(base_path: &Path, category: &str) -> MoveResult<PathBuf> {
    let category_path = base_path.join(category);
    fs::create_dir_all(&category_path).map_err(|source| MoveError::DirectoryCreationFailed {
        path: category_path.clone(),
        source,
    })?;
    Ok(category_path)
}

/// Moves `from` to `to`.
///
/// Uses a rename; if the two paths live on different filesystems the file is
/// copied and the original removed. `to` must not exist; callers obtain it
/// from [`unique_name`].
pub fn move_file(from: &Path, to: &Path) -> MoveResult<()> {
    let wrap = |source: io::Error| MoveError::FileMoveFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(from = %from.display(), to = %to.display(), "rename crosses devices, copying");
            fs::copy(from, to).map_err(wrap)?;
            if let Err(e) = fs::remove_file(from) {
                // Leave a single copy behind rather than two.
                let _ = fs::remove_file(to);
                return Err(wrap(e));
            }
            Ok(())
        }
        Err(e) => Err(wrap(e)),
    }
}

/// True for any entry, including dangling symlinks.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
