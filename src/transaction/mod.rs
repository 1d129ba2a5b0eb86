//! Transaction support for installing a map file atomically
//!
//! This module provides a transaction pattern for replacing the installed
//! map, ensuring that the map file and the version record never disagree
//! after a failure.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = InstallTransaction::begin(&target)?;
//! let file = transaction.create_staged()?;
//!
//! // Write the new map into `file`...
//!
//! transaction.promote()?;
//! prefs.put_int(MAP_VERSION_KEY, version)?;
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // the staged file is removed and the previous map is restored
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, fs as fs_error};
use crate::storage::{self, BACKUP_EXTENSION, STAGED_EXTENSION};

/// A transaction replacing one installed file
#[derive(Debug)]
pub struct InstallTransaction {
    /// Final location of the installed file
    target: PathBuf,

    /// Sibling path the new content is written to
    staged: PathBuf,

    /// Sibling path the previous content is moved to while promoting
    backup: PathBuf,

    /// Whether the staged file has been renamed onto the target
    promoted: bool,

    /// Whether a previous file was moved to the backup path
    backed_up: bool,

    /// Whether the transaction has been committed
    committed: bool,
}

impl InstallTransaction {
    /// Start a transaction for `target`
    ///
    /// Recovers from a previously interrupted transaction first: a stale
    /// staged file is discarded and an orphaned backup is moved back.
    pub fn begin(target: &Path) -> Result<Self> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| fs_error::write_failed(parent, e))?;
        }

        let staged = storage::with_appended_extension(target, STAGED_EXTENSION);
        let backup = storage::with_appended_extension(target, BACKUP_EXTENSION);

        if staged.exists() {
            warn!(path = %staged.display(), "discarding staged file from interrupted extraction");
            fs::remove_file(&staged).map_err(|e| fs_error::write_failed(&staged, e))?;
        }

        if backup.exists() {
            if target.exists() {
                fs::remove_file(&backup).map_err(|e| fs_error::write_failed(&backup, e))?;
            } else {
                warn!(path = %backup.display(), "restoring map from interrupted promotion");
                fs::rename(&backup, target).map_err(|e| fs_error::write_failed(target, e))?;
            }
        }

        Ok(Self {
            target: target.to_path_buf(),
            staged,
            backup,
            promoted: false,
            backed_up: false,
            committed: false,
        })
    }

    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    /// Create the staged file for writing
    pub fn create_staged(&self) -> Result<File> {
        File::create(&self.staged).map_err(|e| fs_error::write_failed(&self.staged, e))
    }

    /// Move the staged file into place, keeping the previous file as backup
    pub fn promote(&mut self) -> Result<()> {
        if self.target.exists() {
            fs::rename(&self.target, &self.backup)
                .map_err(|e| fs_error::write_failed(&self.backup, e))?;
            self.backed_up = true;
        }

        fs::rename(&self.staged, &self.target)
            .map_err(|e| fs_error::write_failed(&self.target, e))?;
        self.promoted = true;

        debug!(target = %self.target.display(), "promoted staged file");
        Ok(())
    }

    /// Commit the transaction (prevent rollback) and drop the backup
    pub fn commit(mut self) {
        if self.backed_up {
            if let Err(e) = fs::remove_file(&self.backup) {
                warn!(path = %self.backup.display(), error = %e, "failed to remove backup");
            }
        }
        self.committed = true;
    }

    /// Manually trigger a rollback
    pub fn rollback(&mut self) -> Result<()> {
        if self.committed {
            return Ok(());
        }

        if self.staged.exists() {
            fs::remove_file(&self.staged).map_err(|e| fs_error::write_failed(&self.staged, e))?;
        }

        if self.promoted {
            if self.backed_up {
                fs::rename(&self.backup, &self.target)
                    .map_err(|e| fs_error::write_failed(&self.target, e))?;
            } else {
                fs::remove_file(&self.target)
                    .map_err(|e| fs_error::write_failed(&self.target, e))?;
            }
            self.promoted = false;
        } else if self.backed_up {
            fs::rename(&self.backup, &self.target)
                .map_err(|e| fs_error::write_failed(&self.target, e))?;
        }
        self.backed_up = false;

        info!(target = %self.target.display(), "rolled back map installation");
        Ok(())
    }
}

impl Drop for InstallTransaction {
    fn drop(&mut self) {
        if !self.committed {
            // Automatic rollback on drop if not committed
            if let Err(e) = self.rollback() {
                warn!(error = %e, "rollback failed");
            }
        }
    }
}
