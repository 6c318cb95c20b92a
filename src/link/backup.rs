// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Backups of displaced files.
//!
//! When a real file or directory sits where a link should go, it gets renamed
//! out of the way with a fixed suffix. Only one backup per target is kept. A
//! new backup silently replaces an older one, and backups are never restored
//! or cleaned up automatically.

use std::{
    ffi::OsString,
    fs::{remove_dir_all, remove_file, rename, symlink_metadata},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Suffix appended to file name of backups.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Determine backup path of target.
///
/// The suffix is appended to the full file name, so "~/.vimrc" becomes
/// "~/.vimrc.bak", and "dir/" becomes "dir.bak".
pub fn backup_path(target: impl AsRef<Path>) -> PathBuf {
    let target = target.as_ref();
    match target.file_name() {
        Some(name) => {
            let mut name = name.to_os_string();
            name.push(BACKUP_SUFFIX);
            target.with_file_name(name)
        }
        None => {
            let mut path = OsString::from(target.as_os_str());
            path.push(BACKUP_SUFFIX);
            PathBuf::from(path)
        }
    }
}

/// Move target out of the way into its backup path.
///
/// Any previous backup is removed first, whether it is a file, a directory, or
/// a symbolic link. Returns the path of the new backup.
///
/// # Errors
///
/// - Return [`BackupError::RemoveStale`] if previous backup cannot be removed.
/// - Return [`BackupError::Rename`] if target cannot be renamed.
pub fn backup(target: impl AsRef<Path>) -> Result<PathBuf> {
    let target = target.as_ref();
    let backup = backup_path(target);

    // INVARIANT: At most one backup per target.
    let removed = match symlink_metadata(&backup) {
        Ok(metadata) if metadata.is_dir() => remove_dir_all(&backup),
        Ok(_) => remove_file(&backup),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    };
    removed.map_err(|err| BackupError::RemoveStale {
        source: err,
        path: backup.clone(),
    })?;

    debug!("back up {:?} to {:?}", target.display(), backup.display());
    rename(target, &backup).map_err(|err| BackupError::Rename {
        source: err,
        path: target.into(),
        backup: backup.clone(),
    })?;

    Ok(backup)
}

/// Backup error types.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// Previous backup cannot be removed.
    #[error("failed to remove existing backup {:?}", path.display())]
    RemoveStale {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Target cannot be renamed to its backup path.
    #[error("error backing up {:?} to {:?}", path.display(), backup.display())]
    Rename {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        backup: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = BackupError> = std::result::Result<T, E>;
