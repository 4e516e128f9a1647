use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::file_record::FileRecord;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileRecordDTO {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    pub size_bytes: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub storage_path: Option<String>,
}

impl FileRecordDTO {
    pub fn for_upload(id: String, name: String, size_bytes: u64, storage_path: String) -> Self {
        Self {
            id,
            name: Some(name),
            size_bytes: Some(size_bytes),
            created_at: Some(Utc::now()),
            storage_path: Some(storage_path),
        }
    }
}

impl From<FileRecord> for FileRecordDTO {
    fn from(value: FileRecord) -> Self {
        FileRecordDTO {
            id: value.id,
            name: Some(value.name),
            size_bytes: Some(value.size_bytes),
            created_at: Some(value.created_at),
            storage_path: Some(value.storage_path),
        }
    }
}

impl From<FileRecordDTO> for FileRecord {
    fn from(value: FileRecordDTO) -> Self {
        FileRecord {
            id: value.id,
            name: value.name.unwrap_or_default(),
            size_bytes: value.size_bytes.unwrap_or(0),
            created_at: value.created_at.unwrap_or_else(Utc::now),
            storage_path: value.storage_path.unwrap_or_default(),
        }
    }
}
