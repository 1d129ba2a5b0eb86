//! Command implementations for tacomap CLI

pub mod check;
pub mod clean;
pub mod completions;
pub mod status;
pub mod update;
pub mod version;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::prefs::{JsonPreferences, MAP_NAMESPACE};
use crate::reconciler::Reconciler;
use crate::source::DirSource;
use crate::storage::StorageLayout;

/// Resolved locations shared by every command
#[derive(Debug, Clone)]
pub struct AppContext {
    pub layout: StorageLayout,
    pub resources: PathBuf,
}

impl AppContext {
    /// Resolve the data directory and resource directory from CLI options
    pub fn resolve(data_dir: Option<PathBuf>, resources: Option<PathBuf>) -> Result<Self> {
        let layout = StorageLayout::resolve(data_dir)?;
        let resources = resources.unwrap_or_else(|| layout.assets_dir());
        Ok(Self { layout, resources })
    }

    pub fn resources(&self) -> &Path {
        &self.resources
    }

    /// Build the reconciler over the resource directory and stored preferences
    pub fn reconciler(&self) -> Result<Reconciler<DirSource>> {
        self.layout.ensure()?;
        let prefs = JsonPreferences::open(&self.layout.prefs_dir(), MAP_NAMESPACE)?;
        debug!(prefs = %prefs.path().display(), resources = %self.resources.display(), "opened map state");
        Ok(Reconciler::new(
            DirSource::new(&self.resources),
            self.layout.map_dir(),
            Box::new(prefs),
        ))
    }
}
