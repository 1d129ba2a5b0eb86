//! Cross-process single-flight lock on the map directory

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs4::FileExt;
use tracing::debug;

use crate::error::{Result, fs as fs_error};
use crate::storage::LOCK_FILE;

/// Exclusive advisory lock held for the duration of a reconciliation
#[derive(Debug)]
pub struct MapDirLock {
    file: File,
    path: PathBuf,
}

impl MapDirLock {
    fn open(map_dir: &Path) -> Result<(File, PathBuf)> {
        fs::create_dir_all(map_dir).map_err(|e| fs_error::lock_failed(map_dir, e))?;
        let path = map_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| fs_error::lock_failed(&path, e))?;
        Ok((file, path))
    }

    /// Block until the map directory lock is held
    pub fn acquire(map_dir: &Path) -> Result<Self> {
        let (file, path) = Self::open(map_dir)?;
        file.lock_exclusive()
            .map_err(|e| fs_error::lock_failed(&path, e))?;
        debug!(path = %path.display(), "acquired map directory lock");
        Ok(Self { file, path })
    }

    /// Take the lock if nobody else holds it
    pub fn try_acquire(map_dir: &Path) -> Result<Option<Self>> {
        let (file, path) = Self::open(map_dir)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file, path })),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(fs_error::lock_failed(&path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MapDirLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(path = %self.path.display(), error = %e, "failed to release map directory lock");
        }
    }
}
