use async_trait::async_trait;

use crate::{
    application::error::ApplicationError,
    domain::models::file::{FileContent, FileData, StoredFile},
};

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Prepares the storage root. With `reset` the existing content is wiped first.
    async fn init(&self, reset: bool) -> Result<(), ApplicationError>;
    /// Sanitizes `filename` first, so an invalid name fails before any lookup.
    async fn exists(&self, filename: &str) -> Result<bool, ApplicationError>;
    async fn upload(&self, file_data: FileData) -> Result<StoredFile, ApplicationError>;
    async fn download(&self, storage_path: &str) -> Result<FileContent, ApplicationError>;
    async fn delete(&self, storage_path: &str) -> Result<(), ApplicationError>;
}
