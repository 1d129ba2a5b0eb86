//! File system errors

use std::path::Path;

use super::TacoError;

/// Creates a file not found error
pub fn not_found(path: impl AsRef<Path>) -> TacoError {
    TacoError::FileNotFound {
        path: path.as_ref().display().to_string(),
    }
}

/// Creates a file read failed error
pub fn read_failed(path: impl AsRef<Path>, reason: impl ToString) -> TacoError {
    TacoError::FileReadFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl AsRef<Path>, reason: impl ToString) -> TacoError {
    TacoError::FileWriteFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a storage unavailable error
pub fn storage_unavailable(message: impl Into<String>) -> TacoError {
    TacoError::StorageUnavailable {
        message: message.into(),
    }
}

/// Creates a lock failed error
pub fn lock_failed(path: impl AsRef<Path>, reason: impl ToString) -> TacoError {
    TacoError::LockFailed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}
