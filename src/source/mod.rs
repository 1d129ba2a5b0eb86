//! Packaged resource sources
//!
//! A [`ResourceSource`] enumerates the packaged map resources that ship with
//! the application and opens them for reading. The reconciler only ever sees
//! this trait, so the bundled assets can live in a directory, inside an
//! archive, or in memory for tests.
//!
//! ## Module Organization
//!
//! - `dir.rs`: resources stored as plain files in a directory

pub mod dir;

use std::io::Read;

use crate::error::Result;

pub use dir::DirSource;

/// Listing and opening of packaged map resources
pub trait ResourceSource: Send + Sync {
    /// Names of every available resource, in no particular order
    fn list(&self) -> Result<Vec<String>>;

    /// Open a resource for reading its compressed bytes
    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>>;

    /// Compressed size of a resource, when the source knows it
    fn compressed_len(&self, name: &str) -> Option<u64> {
        let _ = name;
        None
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory resource source used by unit tests

    use std::collections::BTreeMap;
    use std::io::{Cursor, Read};

    use super::ResourceSource;
    use crate::error::{Result, fs as fs_error};

    #[derive(Debug, Default, Clone)]
    pub struct MemorySource {
        resources: BTreeMap<String, Vec<u8>>,
    }

    impl MemorySource {
        pub fn with(mut self, name: &str, bytes: Vec<u8>) -> Self {
            self.resources.insert(name.to_string(), bytes);
            self
        }
    }

    impl ResourceSource for MemorySource {
        fn list(&self) -> Result<Vec<String>> {
            Ok(self.resources.keys().cloned().collect())
        }

        fn open(&self, name: &str) -> Result<Box<dyn Read + Send>> {
            let bytes = self
                .resources
                .get(name)
                .cloned()
                .ok_or_else(|| fs_error::not_found(name))?;
            Ok(Box::new(Cursor::new(bytes)))
        }

        fn compressed_len(&self, name: &str) -> Option<u64> {
            self.resources.get(name).map(|b| b.len() as u64)
        }
    }
}
