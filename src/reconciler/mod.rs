//! Map update reconciliation
//!
//! One reconciliation cycle compares the newest packaged map resource with
//! the installed version record and extracts the resource when it is newer:
//!
//! ```text
//! CHECKING -> UP_TO_DATE
//!          -> EXTRACTING -> APPLIED
//!                        -> FAILED
//! ```
//!
//! Cycles are serialized twice over: a mutex inside the [`Reconciler`] and an
//! exclusive lock file in the map directory for other processes.
//!
//! ## Module Organization
//!
//! - `extract.rs`: crash-safe decompression into place
//! - `lock.rs`: cross-process map directory lock

pub mod extract;
pub mod lock;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::prefs::{MAP_VERSION_KEY, PreferenceStore};
use crate::resource::{self, MapVersion, ResourceName};
use crate::source::ResourceSource;
use crate::storage::MAP_NAME;

pub use extract::{ExtractOptions, ExtractProgress, ExtractReport, extract};
pub use lock::MapDirLock;

/// Whether the packaged resources contain a map newer than the installed one
///
/// Without an installed file an update is always indicated. Otherwise the
/// packaged resource is selected from `names` and its embedded version must
/// be strictly greater than `installed`.
///
/// Fails with [`crate::error::TacoError::ResourceNotFound`] when an installed file exists
/// and no name follows the packaged naming convention.
pub fn has_update<S: AsRef<str>>(
    names: &[S],
    installed_present: bool,
    installed: MapVersion,
) -> Result<bool> {
    if !installed_present {
        return Ok(true);
    }

    let packaged = resource::select_resource(names)?;
    Ok(packaged.version() > installed)
}

/// Stage reached by a reconciliation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No cycle has run yet
    Idle,
    Checking,
    UpToDate,
    Extracting,
    Applied,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "IDLE",
            Phase::Checking => "CHECKING",
            Phase::UpToDate => "UP_TO_DATE",
            Phase::Extracting => "EXTRACTING",
            Phase::Applied => "APPLIED",
            Phase::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Terminal result of a successful cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The installed map is current
    UpToDate { installed: MapVersion },

    /// No packaged resource was found, so there is nothing to apply
    NoPackage,

    /// A newer map was extracted and recorded
    Applied(ExtractReport),
}

/// Snapshot of the installed and packaged versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheck {
    pub installed_present: bool,
    pub installed: MapVersion,
    pub packaged: Option<ResourceName>,
    pub update_available: bool,
}

struct State {
    prefs: Box<dyn PreferenceStore>,
    phase: Phase,
}

/// Reconciles the installed map with the packaged resources
pub struct Reconciler<S> {
    source: S,
    map_dir: PathBuf,
    state: Mutex<State>,
    cancel: Arc<AtomicBool>,
}

impl<S: ResourceSource> Reconciler<S> {
    pub fn new(source: S, map_dir: impl Into<PathBuf>, prefs: Box<dyn PreferenceStore>) -> Self {
        Self {
            source,
            map_dir: map_dir.into(),
            state: Mutex::new(State {
                prefs,
                phase: Phase::Idle,
            }),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn map_dir(&self) -> &Path {
        &self.map_dir
    }

    pub fn installed_path(&self) -> PathBuf {
        self.map_dir.join(MAP_NAME)
    }

    /// Flag that cancels the extraction of the cycle in flight when raised
    ///
    /// The flag is cleared at the start of every cycle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Phase reached by the most recent cycle
    #[cfg(test)]
    pub fn last_phase(&self) -> Phase {
        self.lock_state().phase
    }

    /// Currently recorded installed version
    #[cfg(test)]
    pub fn installed_version(&self) -> MapVersion {
        let state = self.lock_state();
        MapVersion::new(state.prefs.get_int(MAP_VERSION_KEY, 0))
    }

    // Poisoning is ignored: the install transaction rolls back on unwind
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self, state: &State) -> Result<(Vec<String>, UpdateCheck)> {
        let names = self.source.list()?;
        let installed_present = self.installed_path().is_file();
        let installed = MapVersion::new(state.prefs.get_int(MAP_VERSION_KEY, 0));

        let packaged = match resource::select_resource(&names) {
            Ok(name) => Some(name),
            Err(e) if e.is_recoverable() => None,
            Err(e) => return Err(e),
        };

        let update_available = packaged.is_some()
            && match has_update(&names, installed_present, installed) {
                Ok(update) => update,
                Err(e) if e.is_recoverable() => false,
                Err(e) => return Err(e),
            };

        Ok((
            names,
            UpdateCheck {
                installed_present,
                installed,
                packaged,
                update_available,
            },
        ))
    }

    /// Check for an update without changing anything
    pub fn check(&self) -> Result<UpdateCheck> {
        let state = self.lock_state();
        let (_, check) = self.snapshot(&state)?;
        Ok(check)
    }

    /// Run one reconciliation cycle
    pub fn reconcile(&self, progress: Option<&dyn ExtractProgress>) -> Result<Outcome> {
        let mut state = self.lock_state();
        // Cleared before waiting for the directory lock
        self.cancel.store(false, Ordering::Relaxed);

        let result = self.locked_cycle(&mut state, progress);
        if let Err(e) = &result {
            state.phase = Phase::Failed;
            warn!(phase = %state.phase, error = %e, "map reconciliation failed");
        }
        result
    }

    fn locked_cycle(
        &self,
        state: &mut State,
        progress: Option<&dyn ExtractProgress>,
    ) -> Result<Outcome> {
        let dir_lock = MapDirLock::acquire(&self.map_dir)?;
        debug!(lock = %dir_lock.path().display(), "holding map directory lock");

        // Another process may have installed a map while we waited
        state.prefs.reload()?;

        self.run_cycle(state, progress)
    }

    fn run_cycle(
        &self,
        state: &mut State,
        progress: Option<&dyn ExtractProgress>,
    ) -> Result<Outcome> {
        state.phase = Phase::Checking;
        info!(
            phase = %state.phase,
            map_dir = %self.map_dir.display(),
            namespace = state.prefs.namespace(),
            "reconciling map"
        );

        let (names, check) = self.snapshot(state)?;

        let Some(packaged) = check.packaged else {
            warn!(
                listed = names.len(),
                "no packaged map resource found, treating as no update"
            );
            state.phase = Phase::UpToDate;
            return Ok(Outcome::NoPackage);
        };

        if !check.update_available {
            state.phase = Phase::UpToDate;
            info!(
                phase = %state.phase,
                installed = %check.installed,
                packaged = %packaged.version(),
                "map is up to date"
            );
            return Ok(Outcome::UpToDate {
                installed: check.installed,
            });
        }

        state.phase = Phase::Extracting;
        info!(
            phase = %state.phase,
            installed = %check.installed,
            packaged = %packaged.version(),
            bootstrap = !check.installed_present,
            "applying packaged map"
        );

        let reader = self.source.open(packaged.as_str())?;
        let options = ExtractOptions {
            cancel: Some(&self.cancel),
            progress,
            compressed_len: self.source.compressed_len(packaged.as_str()),
        };
        let report = extract(
            reader,
            &self.installed_path(),
            packaged.version(),
            state.prefs.as_mut(),
            options,
        )?;

        state.phase = Phase::Applied;
        info!(phase = %state.phase, version = %report.version, "map reconciliation applied");
        Ok(Outcome::Applied(report))
    }
}
