use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::{
        repositories::file_record_repository::FileRecordRepository, services::StorageService,
    },
    domain::config::server::ServerConfig,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub file_record_repository: Arc<dyn FileRecordRepository>,
    pub storage_service: Arc<dyn StorageService>,
}
