use async_trait::async_trait;
use sqlx::query_as;

use crate::{
    application::{
        dto::file_record_dto::FileRecordDTO, error::ApplicationError,
        repositories::file_record_repository::FileRecordRepository,
    },
    domain::models::file_record::FileRecord,
};

pub struct PgFileRecordRepository {
    pool: sqlx::PgPool,
}

impl PgFileRecordRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Creates the schema and the metadata table when they are missing.
    pub async fn ensure_schema(&self) -> Result<(), ApplicationError> {
        sqlx::query("CREATE SCHEMA IF NOT EXISTS application")
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        let query = r#"
            CREATE TABLE IF NOT EXISTS application.video_metadata (
                fileid TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                size BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                path TEXT NOT NULL
            )
        "#;

        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl FileRecordRepository for PgFileRecordRepository {
    async fn create_record(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
        let mut record = record;
        record.sanitize();

        let query = r#"
            INSERT INTO application.video_metadata (fileid, name, size, created_at, path)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        "#;

        let new_record: FileRecord = record.into();

        let created: FileRecordDTO = query_as::<_, FileRecordDTO>(query)
            .bind(&new_record.id)
            .bind(&new_record.name)
            .bind(new_record.size_bytes as i64)
            .bind(new_record.created_at)
            .bind(&new_record.storage_path)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(created.into())
    }

    async fn get_record(&self, file_id: &str) -> Result<FileRecord, ApplicationError> {
        let query = "SELECT * FROM application.video_metadata WHERE fileid = $1";

        let fetched: Option<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        fetched.map(Into::into).ok_or(ApplicationError::NotFound)
    }

    async fn list_records(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = "SELECT * FROM application.video_metadata ORDER BY created_at, fileid";

        let rows: Vec<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }

    async fn delete_record(&self, file_id: &str) -> Result<FileRecord, ApplicationError> {
        let query = "DELETE FROM application.video_metadata WHERE fileid = $1 RETURNING *";

        let deleted: Option<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        deleted.map(Into::into).ok_or(ApplicationError::NotFound)
    }

    async fn delete_all(&self) -> Result<u64, ApplicationError> {
        let result = sqlx::query("DELETE FROM application.video_metadata")
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
