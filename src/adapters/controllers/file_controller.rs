use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::io::ReaderStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    adapters::{dto::file_dto::UploadedFileResponse, state::AppState},
    application::{dto::file_record_dto::FileRecordDTO, error::ApplicationError},
    domain::models::file::FileData,
};

/// Multipart field names accepted for the video payload.
const FILE_FIELDS: [&str; 2] = ["data", "file"];

pub struct FileController;

impl FileController {
    /// POST /files
    pub async fn upload_file(
        State(app_state): State<AppState>,
        mut multipart: Multipart,
    ) -> Result<Response, ApplicationError> {
        let mut upload: Option<(Option<String>, Option<String>, axum::body::Bytes)> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })? {
            let name = field.name().unwrap_or("").to_string();
            if upload.is_some() || !FILE_FIELDS.contains(&name.as_str()) {
                continue;
            }

            let filename = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let bytes = field.bytes().await.map_err(|e| {
                warn!("Cannot read file bytes: {}", e);
                ApplicationError::BadRequest("Invalid file data".to_string())
            })?;

            upload = Some((filename, content_type, bytes));
        }

        let (filename, content_type, bytes) = upload.ok_or_else(|| {
            ApplicationError::BadRequest("Missing 'data' or 'file' field".to_string())
        })?;

        if bytes.is_empty() {
            return Err(ApplicationError::BadRequest(
                "Data to upload is empty".to_string(),
            ));
        }

        let filename = filename
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ApplicationError::BadRequest("Missing filename".to_string()))?;

        let content_type = content_type.unwrap_or_default();
        if !app_state.config.is_mime_type_allowed(&content_type) {
            return Err(ApplicationError::UnsupportedMediaType(format!(
                "'{}' is not an allowed content type",
                content_type
            )));
        }

        let storage = &app_state.storage_service;
        if storage.exists(&filename).await? {
            return Err(ApplicationError::Conflict(format!(
                "File with name '{}' already exists in storage",
                filename
            )));
        }

        let file_data = FileData::new(bytes, filename.clone());
        let stored = storage.upload(file_data).await?;

        let record_dto = FileRecordDTO::for_upload(
            Uuid::new_v4().to_string(),
            filename,
            stored.size,
            stored.storage_path.clone(),
        );

        let record = match app_state
            .file_record_repository
            .create_record(record_dto)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                if let Err(cleanup) = storage.delete(&stored.storage_path).await {
                    warn!(
                        "Failed to remove '{}' after metadata insert failed: {:?}",
                        stored.storage_path, cleanup
                    );
                }
                return Err(e);
            }
        };

        info!(
            file_id = %record.id,
            path = %record.storage_path,
            size_bytes = record.size_bytes,
            "Stored video {}",
            record.name
        );

        let location = HeaderValue::from_str(&urlencoding::encode(&record.storage_path))
            .map_err(|e| ApplicationError::StorageFailure(e.to_string()))?;

        Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
    }

    /// GET /files
    pub async fn list_files(
        State(app_state): State<AppState>,
    ) -> Result<Json<Vec<UploadedFileResponse>>, ApplicationError> {
        let records = app_state.file_record_repository.list_records().await?;
        Ok(Json(records.into_iter().map(Into::into).collect()))
    }

    /// GET /files/{fileid}
    pub async fn download_file(
        State(app_state): State<AppState>,
        Path(file_id): Path<String>,
    ) -> Result<Response, ApplicationError> {
        let record = app_state
            .file_record_repository
            .get_record(&file_id)
            .await
            .inspect_err(|_| warn!("Video file with ID {} could not be found", file_id))?;

        let content = app_state
            .storage_service
            .download(&record.storage_path)
            .await?;

        info!(
            file_id = %record.id,
            path = %record.storage_path,
            "Downloading video {}",
            record.name
        );

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content.mime_type)
            .header(header::CONTENT_LENGTH, content.size)
            .header(header::CONTENT_DISPOSITION, content_disposition(&record.name))
            .body(Body::from_stream(ReaderStream::new(content.file)))
            .map_err(|e| ApplicationError::StorageFailure(e.to_string()))
    }

    /// DELETE /files/{fileid}
    pub async fn delete_file(
        State(app_state): State<AppState>,
        Path(file_id): Path<String>,
    ) -> Result<StatusCode, ApplicationError> {
        let record = app_state.file_record_repository.get_record(&file_id).await?;

        app_state
            .storage_service
            .delete(&record.storage_path)
            .await?;

        app_state
            .file_record_repository
            .delete_record(&file_id)
            .await?;

        info!(file_id = %record.id, "Deleted {} from the video storage", record.name);

        Ok(StatusCode::NO_CONTENT)
    }
}

/// `inline` disposition carrying the original name. Names that are not plain
/// ASCII also get an RFC 5987 `filename*` parameter.
fn content_disposition(filename: &str) -> String {
    let is_plain = filename.chars().all(|c| c.is_ascii_graphic() || c == ' ');
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    if is_plain && fallback == filename {
        format!("inline; filename=\"{}\"", filename)
    } else {
        format!(
            "inline; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}
