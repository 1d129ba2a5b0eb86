//! Packaged map resource errors

use super::TacoError;

/// Creates a resource not found error
pub fn not_found(available: usize) -> TacoError {
    TacoError::ResourceNotFound { available }
}

/// Creates an invalid resource name error
pub fn invalid_name(name: impl Into<String>) -> TacoError {
    TacoError::InvalidResourceName { name: name.into() }
}

/// Creates a decompression failed error
pub fn decompression_failed(resource: impl Into<String>, reason: impl ToString) -> TacoError {
    TacoError::Decompression {
        resource: resource.into(),
        reason: reason.to_string(),
    }
}
