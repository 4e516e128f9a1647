use sqlx::{postgres::PgRow, FromRow, Row};

use crate::application::dto::file_record_dto::FileRecordDTO;

impl FromRow<'_, PgRow> for FileRecordDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let size: i64 = row.try_get("size")?;

        Ok(FileRecordDTO {
            id: row.try_get("fileid")?,
            name: Some(row.try_get("name")?),
            size_bytes: Some(size.max(0) as u64),
            created_at: Some(row.try_get("created_at")?),
            storage_path: Some(row.try_get("path")?),
        })
    }
}

impl FileRecordDTO {
    pub fn sanitize(&mut self) {
        if let Some(size) = self.size_bytes {
            self.size_bytes = Some(std::cmp::min(size, i64::MAX as u64));
        }
    }
}
