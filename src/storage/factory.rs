use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::client::GcsObjectStore;
use super::interface::ObjectStore;
use super::local::LocalObjectStore;
use super::memory::MemoryObjectStore;
use crate::config_manager::ServiceConfig;
use crate::google_service::GoogleServiceClient;

/// Factory for creating object stores
pub struct StorageFactory;

impl StorageFactory {
    pub fn create_store(
        service_config: &ServiceConfig,
        google_service: Arc<GoogleServiceClient>,
    ) -> Result<Arc<dyn ObjectStore>> {
        info!(
            "Initializing storage backend: {}",
            service_config.storage_backend
        );

        match service_config.storage_backend.as_str() {
            "gcs" => Ok(Arc::new(GcsObjectStore::new(google_service))),
            "local" => {
                info!("Writing results below {}", service_config.local_storage_dir);
                Ok(Arc::new(LocalObjectStore::new(
                    &service_config.local_storage_dir,
                )))
            }
            "memory" => Ok(Arc::new(MemoryObjectStore::new())),
            other => Err(anyhow::anyhow!("Unsupported storage backend: {}", other)),
        }
    }
}
