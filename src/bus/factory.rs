use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::client::PubSubPublisher;
use super::interface::Publisher;
use super::memory::MemoryPublisher;
use crate::config_manager::ServiceConfig;
use crate::google_service::GoogleServiceClient;

/// Factory for creating message bus publishers
pub struct PublisherFactory;

impl PublisherFactory {
    /// Create a publisher based on configuration
    ///
    /// # Arguments
    /// * `service_config` - Collaborator configuration
    /// * `project_id` - Project owning the topics
    /// * `google_service` - Shared client for the Google APIs
    pub fn create_publisher(
        service_config: &ServiceConfig,
        project_id: &str,
        google_service: Arc<GoogleServiceClient>,
    ) -> Result<Arc<dyn Publisher>> {
        info!(
            "Initializing publisher backend: {}",
            service_config.publisher_backend
        );

        match service_config.publisher_backend.as_str() {
            "pubsub" => Ok(Arc::new(PubSubPublisher::new(
                google_service,
                project_id.to_string(),
            ))),
            "memory" => {
                warn!("Messages are kept in memory and never delivered");
                Ok(Arc::new(MemoryPublisher::new()))
            }
            other => Err(anyhow::anyhow!("Unsupported publisher backend: {}", other)),
        }
    }
}
