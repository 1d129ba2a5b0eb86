//! Storage layout for installed maps and preferences
//!
//! ```text
//! <data dir>/
//!   assets/                      packaged resources (default source)
//!   map/
//!     taiwan-taco.map            installed map
//!     taiwan-taco.map.tmp        staged extraction (transient)
//!     taiwan-taco.map.bak        previous map while promoting (transient)
//!     .tacomap.lock              single-flight lock
//!   prefs/
//!     TaiwanMapView.json         preference namespace
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, fs as fs_error};

/// Application directory name under the user's data directory
const APP_DIR: &str = "tacomap";

/// Subdirectory holding the installed map
pub const MAP_DIR: &str = "map";

/// Subdirectory holding preference namespaces
pub const PREFS_DIR: &str = "prefs";

/// Default subdirectory for packaged resources
pub const ASSETS_DIR: &str = "assets";

/// File name of the installed map
pub const MAP_NAME: &str = "taiwan-taco.map";

/// Lock file serializing reconciliations across processes
pub const LOCK_FILE: &str = ".tacomap.lock";

/// Extension appended to a staged extraction
pub const STAGED_EXTENSION: &str = "tmp";

/// Extension appended to the previous map while a new one is promoted
pub const BACKUP_EXTENSION: &str = "bak";

/// Get the default data directory
///
/// Uses the platform's standard data location (e.g. XDG on Linux,
/// Library/Application Support on macOS) with a `tacomap` subdirectory.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| fs_error::storage_unavailable("could not determine data directory"))?;
    Ok(base.join(APP_DIR))
}

/// Append an extension to a full file name (`a.map` -> `a.map.tmp`)
pub fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Resolved directory layout rooted at one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use an explicit root when given, else the platform default
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(root) => Ok(Self::new(root)),
            None => Ok(Self::new(default_data_dir()?)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn map_dir(&self) -> PathBuf {
        self.root.join(MAP_DIR)
    }

    pub fn prefs_dir(&self) -> PathBuf {
        self.root.join(PREFS_DIR)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }

    pub fn installed_map(&self) -> PathBuf {
        self.map_dir().join(MAP_NAME)
    }

    /// Create the map and preference directories
    pub fn ensure(&self) -> Result<()> {
        for dir in [self.map_dir(), self.prefs_dir()] {
            fs::create_dir_all(&dir).map_err(|e| {
                fs_error::storage_unavailable(format!("{}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

/// Leftover files from interrupted extractions in a map directory
///
/// A backup is only reported while the installed map exists next to it;
/// otherwise it is the last good map and must be kept for recovery.
pub fn find_leftovers(map_dir: &Path) -> Result<Vec<PathBuf>> {
    if !map_dir.is_dir() {
        return Ok(Vec::new());
    }

    let installed_present = map_dir.join(MAP_NAME).is_file();
    let entries = fs::read_dir(map_dir).map_err(|e| fs_error::read_failed(map_dir, e))?;

    let mut leftovers = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| fs_error::read_failed(map_dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(STAGED_EXTENSION) => leftovers.push(path),
            Some(BACKUP_EXTENSION) if installed_present => leftovers.push(path),
            Some(BACKUP_EXTENSION) => {
                warn!(path = %path.display(), "keeping backup map, no installed map next to it");
            }
            _ => {}
        }
    }
    leftovers.sort();
    Ok(leftovers)
}

/// Remove leftovers from interrupted extractions, returning what was removed
pub fn clean_leftovers(map_dir: &Path) -> Result<Vec<PathBuf>> {
    let leftovers = find_leftovers(map_dir)?;
    for path in &leftovers {
        fs::remove_file(path).map_err(|e| fs_error::write_failed(path, e))?;
        debug!(path = %path.display(), "removed leftover");
    }
    Ok(leftovers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = StorageLayout::new("/data/tacomap");
        assert_eq!(layout.map_dir(), PathBuf::from("/data/tacomap/map"));
        assert_eq!(layout.prefs_dir(), PathBuf::from("/data/tacomap/prefs"));
        assert_eq!(layout.assets_dir(), PathBuf::from("/data/tacomap/assets"));
        assert_eq!(
            layout.installed_map(),
            PathBuf::from("/data/tacomap/map/taiwan-taco.map")
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_root() {
        let layout = StorageLayout::resolve(Some(PathBuf::from("/explicit"))).unwrap();
        assert_eq!(layout.root(), Path::new("/explicit"));
    }

    #[test]
    fn test_with_appended_extension() {
        assert_eq!(
            with_appended_extension(Path::new("/m/taiwan-taco.map"), STAGED_EXTENSION),
            PathBuf::from("/m/taiwan-taco.map.tmp")
        );
    }

    #[test]
    fn test_ensure_creates_directories() {
        let temp = TempDir::new().unwrap();
        let layout = StorageLayout::new(temp.path().join("root"));
        layout.ensure().unwrap();
        assert!(layout.map_dir().is_dir());
        assert!(layout.prefs_dir().is_dir());
    }

    #[test]
    fn test_clean_leftovers_keeps_installed_map_and_lock() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join(MAP_NAME), "map").unwrap();
        fs::write(dir.join(LOCK_FILE), "").unwrap();
        fs::write(dir.join("taiwan-taco.map.tmp"), "partial").unwrap();
        fs::write(dir.join("taiwan-taco.map.bak"), "old").unwrap();

        let removed = clean_leftovers(dir).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(dir.join(MAP_NAME).exists());
        assert!(dir.join(LOCK_FILE).exists());
        assert!(!dir.join("taiwan-taco.map.tmp").exists());
        assert!(!dir.join("taiwan-taco.map.bak").exists());
    }

    #[test]
    fn test_orphaned_backup_is_kept() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("taiwan-taco.map.bak"), "old").unwrap();

        assert!(clean_leftovers(temp.path()).unwrap().is_empty());
        assert!(temp.path().join("taiwan-taco.map.bak").exists());
    }

    #[test]
    fn test_leftovers_of_missing_directory() {
        let temp = TempDir::new().unwrap();
        assert!(find_leftovers(&temp.path().join("missing")).unwrap().is_empty());
    }
}
