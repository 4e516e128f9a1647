#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::{
    multipart::{MultipartForm, Part},
    TestResponse, TestServer,
};
use tempfile::TempDir;
use video_server::{
    adapters::{router::build_router, state::AppState},
    application::{
        dto::file_record_dto::FileRecordDTO, error::ApplicationError,
        repositories::file_record_repository::FileRecordRepository, services::StorageService,
    },
    domain::{config::server::ServerConfig, models::file_record::FileRecord},
    services::LocalStorageService,
};

/// Keeps records in memory in insertion order.
#[derive(Default)]
pub struct InMemoryFileRecordRepository {
    records: Mutex<Vec<FileRecord>>,
    fail_inserts: bool,
}

impl InMemoryFileRecordRepository {
    pub fn failing_inserts() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_inserts: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl FileRecordRepository for InMemoryFileRecordRepository {
    async fn create_record(&self, record: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
        if self.fail_inserts {
            return Err(ApplicationError::DatabaseError(
                "connection reset".to_string(),
            ));
        }

        let record: FileRecord = record.into();
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.id == record.id) {
            return Err(ApplicationError::DatabaseError(
                "duplicate key value violates unique constraint".to_string(),
            ));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn get_record(&self, file_id: &str) -> Result<FileRecord, ApplicationError> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == file_id)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn list_records(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn delete_record(&self, file_id: &str) -> Result<FileRecord, ApplicationError> {
        let mut records = self.records.lock().unwrap();
        let index = records
            .iter()
            .position(|r| r.id == file_id)
            .ok_or(ApplicationError::NotFound)?;
        Ok(records.remove(index))
    }

    async fn delete_all(&self) -> Result<u64, ApplicationError> {
        let mut records = self.records.lock().unwrap();
        let count = records.len() as u64;
        records.clear();
        Ok(count)
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryFileRecordRepository>,
    pub storage_root: std::path::PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_with(InMemoryFileRecordRepository::default(), |_| {}).await
}

pub async fn setup_with<F>(repository: InMemoryFileRecordRepository, configure: F) -> TestApp
where
    F: FnOnce(&mut ServerConfig),
{
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage_root = temp_dir.path().join("videoserver");

    let mut config = ServerConfig::with_storage_root("postgres://unused", &storage_root);
    configure(&mut config);

    let storage = LocalStorageService::new(&config.storage_root).expect("Invalid storage root");
    storage
        .init(config.reset_storage_on_startup)
        .await
        .expect("Failed to initialize storage");

    let repository = Arc::new(repository);
    let app_state = AppState {
        config: Arc::new(config),
        file_record_repository: repository.clone(),
        storage_service: Arc::new(storage) as Arc<dyn StorageService>,
    };

    let server = TestServer::new(build_router(app_state)).expect("Failed to create test server");

    TestApp {
        server,
        repository,
        storage_root,
        _temp_dir: temp_dir,
    }
}

pub fn video_form(field: &str, filename: &str, mime_type: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(bytes.to_vec())
            .file_name(filename)
            .mime_type(mime_type),
    )
}

pub async fn upload_video(client: &TestServer, filename: &str, bytes: &[u8]) -> TestResponse {
    client
        .post("/v1/files")
        .multipart(video_form("data", filename, "video/mp4", bytes))
        .await
}
