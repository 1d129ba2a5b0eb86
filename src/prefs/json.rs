//! JSON file preference store
//!
//! Each namespace lives in `<dir>/<namespace>.json`:
//!
//! ```json
//! {
//!   "namespace": "TaiwanMapView",
//!   "values": {
//!     "map.version": 2016053101
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PreferenceStore;
use crate::error::{Result, fs as fs_error, prefs as prefs_error};
use crate::storage::{self, STAGED_EXTENSION};

/// On-disk representation of one namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PreferenceFile {
    namespace: String,
    #[serde(default)]
    values: BTreeMap<String, u64>,
}

/// Preference store persisted as a JSON file per namespace
#[derive(Debug)]
pub struct JsonPreferences {
    path: PathBuf,
    file: PreferenceFile,
}

impl JsonPreferences {
    /// Open (or lazily create) the store for `namespace` under `dir`
    ///
    /// The file is only written on the first `put_int`.
    pub fn open(dir: &Path, namespace: &str) -> Result<Self> {
        let path = dir.join(format!("{namespace}.json"));
        let file = Self::load(&path, namespace)?;
        Ok(Self { path, file })
    }

    fn load(path: &Path, namespace: &str) -> Result<PreferenceFile> {
        if !path.exists() {
            return Ok(PreferenceFile {
                namespace: namespace.to_string(),
                values: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| fs_error::read_failed(path, e))?;
        let mut file: PreferenceFile =
            serde_json::from_str(&content).map_err(|e| prefs_error::parse_failed(path, e))?;
        if file.namespace != namespace {
            debug!(
                path = %path.display(),
                found = %file.namespace,
                "preference file namespace differs, rescoping"
            );
            file.namespace = namespace.to_string();
        }
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store with a temp file + rename so readers never see a
    /// partially written file
    fn save(&self, file: &PreferenceFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| prefs_error::write_failed(parent, e))?;
        }

        let content = serde_json::to_string_pretty(file)
            .map_err(|e| prefs_error::write_failed(&self.path, e))?;

        let tmp_path = storage::with_appended_extension(&self.path, STAGED_EXTENSION);

        let write_synced = || -> std::io::Result<()> {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(content.as_bytes())?;
            tmp.sync_all()
        };
        write_synced().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            prefs_error::write_failed(&tmp_path, e)
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            prefs_error::write_failed(&self.path, e)
        })
    }
}

impl PreferenceStore for JsonPreferences {
    fn namespace(&self) -> &str {
        &self.file.namespace
    }

    fn get_int(&self, key: &str, default: u64) -> u64 {
        self.file.values.get(key).copied().unwrap_or(default)
    }

    fn put_int(&mut self, key: &str, value: u64) -> Result<()> {
        // Only adopt the new value once it is on disk
        let mut next = self.file.clone();
        next.values.insert(key.to_string(), value);
        self.save(&next)?;
        self.file = next;

        debug!(path = %self.path.display(), key, value, "stored preference");
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        self.file = Self::load(&self.path, &self.file.namespace)?;
        Ok(())
    }
}
