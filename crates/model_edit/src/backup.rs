use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::document::write_atomic;
use crate::error::{EditError, Result};

pub const BACKUP_SUFFIX: &str = ".backup";

/// `<path>.backup`, next to the asset.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copies `path` to its backup unless a backup already exists.
///
/// Returns whether a new backup was written. An existing backup is never
/// replaced, so it always holds the asset as it was before its first edit.
pub fn ensure_backup(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    if backup.exists() {
        return Ok(false);
    }

    fs::copy(path, &backup).map_err(|source| EditError::Backup {
        path: backup.clone(),
        source,
    })?;
    info!(backup = %backup.display(), "created backup");
    Ok(true)
}

/// Copies the backup of `path` back over it. Returns false when there is no
/// backup to restore from.
pub fn restore(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    if !backup.exists() {
        return Ok(false);
    }

    let bytes = fs::read(&backup).map_err(|source| EditError::Backup {
        path: backup.clone(),
        source,
    })?;
    write_atomic(path, &bytes).map_err(|source| EditError::Backup {
        path: path.to_owned(),
        source,
    })?;
    info!(path = %path.display(), "restored from backup");
    Ok(true)
}

/// Deletes the backup of `path`, if there is one.
pub fn discard(path: &Path) -> Result<()> {
    let backup = backup_path(path);
    match fs::remove_file(&backup) {
        Ok(()) => {
            info!(backup = %backup.display(), "discarded backup");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(EditError::Backup { path: backup, source }),
    }
}

/// Holds the state of an asset from before a request started editing it.
///
/// Taking the guard makes sure the on-disk backup exists. Unless the guard is
/// committed, the asset is put back the way it was: explicitly through
/// [`BackupGuard::restore`], or on drop.
pub struct BackupGuard {
    path: PathBuf,
    snapshot: Vec<u8>,
    created_backup: bool,
    armed: bool,
}

impl BackupGuard {
    pub fn take(path: &Path) -> Result<Self> {
        let created_backup = ensure_backup(path)?;
        let snapshot = fs::read(path).map_err(|source| EditError::Backup {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self {
            path: path.to_owned(),
            snapshot,
            created_backup,
            armed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether taking this guard wrote the on-disk backup.
    pub fn created_backup(&self) -> bool {
        self.created_backup
    }

    /// Keeps the edits.
    pub fn commit(mut self) {
        self.armed = false;
    }

    /// Discards the edits, putting the pre-request bytes back.
    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        self.put_back()
    }

    fn put_back(&self) -> Result<()> {
        match write_atomic(&self.path, &self.snapshot) {
            Ok(()) => {
                warn!(path = %self.path.display(), "rolled back edits");
                Ok(())
            }
            Err(err) => {
                // Last resort, the on-disk copy of the original.
                warn!(path = %self.path.display(), "rollback failed ({}), trying backup file", err);
                if restore(&self.path)? {
                    Ok(())
                } else {
                    Err(EditError::Backup {
                        path: self.path.clone(),
                        source: err,
                    })
                }
            }
        }
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.put_back() {
                error!(path = %self.path.display(), "failed to roll back edits: {}", err);
            }
        }
    }
}
