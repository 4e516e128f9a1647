use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::InvalidPath(msg) => ApplicationError::InvalidPath(msg),
            StorageError::NotFound(_) => ApplicationError::NotFound,
            StorageError::AlreadyExists(msg) => ApplicationError::Conflict(msg),
            StorageError::IoError(msg) => {
                ApplicationError::StorageFailure(format!("Storage error: {}", msg))
            }
        }
    }
}

impl StorageError {
    /// Maps an I/O failure on `path`, keeping the not-found and already-exists
    /// cases distinguishable for callers.
    pub fn from_io(error: std::io::Error, path: &std::path::Path) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            std::io::ErrorKind::AlreadyExists => {
                StorageError::AlreadyExists(path.display().to_string())
            }
            std::io::ErrorKind::InvalidInput => {
                StorageError::InvalidPath(format!("{}: {}", path.display(), error))
            }
            _ => StorageError::IoError(format!("{}: {}", path.display(), error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::Path};

    use super::*;

    #[test]
    fn io_errors_keep_their_kind() {
        let path = Path::new("/tmp/videoserver/a.mp4");

        let not_found = StorageError::from_io(io::Error::from(io::ErrorKind::NotFound), path);
        assert!(matches!(not_found, StorageError::NotFound(_)));

        let exists = StorageError::from_io(io::Error::from(io::ErrorKind::AlreadyExists), path);
        assert!(matches!(exists, StorageError::AlreadyExists(_)));

        let rejected = StorageError::from_io(io::Error::from(io::ErrorKind::InvalidInput), path);
        assert!(matches!(rejected, StorageError::InvalidPath(_)));

        let denied =
            StorageError::from_io(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert!(matches!(denied, StorageError::IoError(_)));
    }

    #[test]
    fn storage_errors_map_to_application_errors() {
        assert!(matches!(
            ApplicationError::from(StorageError::NotFound("x".into())),
            ApplicationError::NotFound
        ));
        assert!(matches!(
            ApplicationError::from(StorageError::AlreadyExists("x".into())),
            ApplicationError::Conflict(_)
        ));
        assert!(matches!(
            ApplicationError::from(StorageError::InvalidPath("x".into())),
            ApplicationError::InvalidPath(_)
        ));
        assert!(matches!(
            ApplicationError::from(StorageError::IoError("x".into())),
            ApplicationError::StorageFailure(_)
        ));
    }
}
