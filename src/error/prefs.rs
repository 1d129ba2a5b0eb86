//! Preference store errors

use std::path::Path;

use super::TacoError;

/// Creates a preferences parse failed error
pub fn parse_failed(path: impl AsRef<Path>, reason: impl ToString) -> TacoError {
    TacoError::PreferencesParseFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a preferences write failed error
pub fn write_failed(path: impl AsRef<Path>, reason: impl ToString) -> TacoError {
    TacoError::PreferencesWriteFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}
