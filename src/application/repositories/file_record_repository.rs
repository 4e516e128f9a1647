use async_trait::async_trait;

use crate::{
    application::{dto::file_record_dto::FileRecordDTO, error::ApplicationError},
    domain::models::file_record::FileRecord,
};

#[async_trait]
pub trait FileRecordRepository: Send + Sync {
    async fn create_record(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError>;
    /// Fails with `ApplicationError::NotFound` when no record has this id.
    async fn get_record(&self, file_id: &str) -> Result<FileRecord, ApplicationError>;
    async fn list_records(&self) -> Result<Vec<FileRecord>, ApplicationError>;
    async fn delete_record(&self, file_id: &str) -> Result<FileRecord, ApplicationError>;
    /// Removes every record, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, ApplicationError>;
}
