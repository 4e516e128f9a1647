mod error;
mod local_storage;

pub use error::StorageError;
pub use local_storage::LocalStorageService;

use std::sync::Arc;

use crate::{application::services::StorageService, domain::config::server::ServerConfig};

pub fn create_storage_service(
    config: &ServerConfig,
) -> Result<Arc<dyn StorageService>, StorageError> {
    let service = LocalStorageService::new(&config.storage_root)?;
    Ok(Arc::new(service))
}
