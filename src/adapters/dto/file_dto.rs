use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::file_record::FileRecord;

/// List projection of a stored video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFileResponse {
    pub fileid: String,
    pub name: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for UploadedFileResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            fileid: record.id,
            name: record.name,
            size: record.size_bytes,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let response = UploadedFileResponse::from(FileRecord {
            id: "42".to_string(),
            name: "clip.mp4".to_string(),
            size_bytes: 1024,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            storage_path: "clip.mp4".to_string(),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fileid": "42",
                "name": "clip.mp4",
                "size": 1024,
                "created_at": "2024-05-01T12:00:00Z",
            })
        );
    }
}
