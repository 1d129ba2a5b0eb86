//! Directory-backed resource source

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ResourceSource;
use crate::error::{Result, fs as fs_error};

/// Packaged resources stored as regular files in one directory
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a listed name to its path, refusing anything that escapes the root
    fn resource_path(&self, name: &str) -> Result<PathBuf> {
        let is_plain = Path::new(name)
            .file_name()
            .is_some_and(|file_name| file_name == name);
        if !is_plain {
            return Err(fs_error::not_found(self.root.join(name)));
        }
        Ok(self.root.join(name))
    }
}

impl ResourceSource for DirSource {
    fn list(&self) -> Result<Vec<String>> {
        // A missing asset directory lists as empty; selection then reports it
        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "resource directory does not exist");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| fs_error::read_failed(&self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| fs_error::read_failed(&self.root, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        debug!(root = %self.root.display(), count = names.len(), "listed packaged resources");
        Ok(names)
    }

    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>> {
        let path = self.resource_path(name)?;
        let file = File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                fs_error::not_found(&path)
            } else {
                fs_error::read_failed(&path, e)
            }
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn compressed_len(&self, name: &str) -> Option<u64> {
        let path = self.resource_path(name).ok()?;
        fs::metadata(path).ok().map(|m| m.len())
    }
}
