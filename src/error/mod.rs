//! Error types and handling for tacomap
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - fs: file system errors
//! - prefs: preference store errors
//! - resource: packaged map resource errors

pub mod fs;
pub mod prefs;
pub mod resource;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tacomap operations
#[derive(Error, Diagnostic, Debug)]
pub enum TacoError {
    // Resource errors
    #[error("No packaged map resource found ({available} resource(s) listed)")]
    #[diagnostic(
        code(tacomap::resource::not_found),
        help("Packaged maps must be named like gzipped-taiwan-taco-2016053101.map")
    )]
    ResourceNotFound { available: usize },

    #[error("Invalid map resource name: {name}")]
    #[diagnostic(
        code(tacomap::resource::invalid_name),
        help("Expected gzipped-taiwan-taco-<10 digits>.map")
    )]
    InvalidResourceName { name: String },

    #[error("Failed to decompress {resource}: {reason}")]
    #[diagnostic(
        code(tacomap::resource::decompression_failed),
        help("The packaged map is not a valid gzip stream; the installed map was left untouched")
    )]
    Decompression { resource: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(tacomap::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(tacomap::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(tacomap::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("No usable storage directory: {message}")]
    #[diagnostic(
        code(tacomap::fs::storage_unavailable),
        help("Pass --data-dir or set TACOMAP_DATA_DIR")
    )]
    StorageUnavailable { message: String },

    // Preference errors
    #[error("Failed to parse preferences: {path}: {reason}")]
    #[diagnostic(
        code(tacomap::prefs::parse_failed),
        help("Remove the file to reset the stored preferences")
    )]
    PreferencesParseFailed { path: String, reason: String },

    #[error("Failed to write preferences: {path}: {reason}")]
    #[diagnostic(code(tacomap::prefs::write_failed))]
    PreferencesWriteFailed { path: String, reason: String },

    // Reconciliation errors
    #[error("Failed to lock map directory: {path}: {reason}")]
    #[diagnostic(code(tacomap::reconcile::lock_failed))]
    LockFailed { path: String, reason: String },

    #[error("Map extraction was cancelled")]
    #[diagnostic(code(tacomap::reconcile::cancelled))]
    Cancelled,

    // CLI errors
    #[error("Unsupported shell: {shell}")]
    #[diagnostic(
        code(tacomap::cli::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },
}

impl TacoError {
    /// Whether the caller should treat this error as "no update available"
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TacoError::ResourceNotFound { .. })
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, TacoError>;
