use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::interface::{OutboundMessage, Publisher};
use crate::google_service::GoogleServiceClient;

/// Publisher for Cloud Pub/Sub topics of one project
pub struct PubSubPublisher {
    google_service: Arc<GoogleServiceClient>,
    project_id: String,
}

impl PubSubPublisher {
    pub fn new(google_service: Arc<GoogleServiceClient>, project_id: String) -> Self {
        Self {
            google_service,
            project_id,
        }
    }
}

#[async_trait]
impl Publisher for PubSubPublisher {
    async fn publish(
        &self,
        topic: &str,
        message: OutboundMessage,
    ) -> Result<String, anyhow::Error> {
        let id = self
            .google_service
            .publish(&self.project_id, topic, &message.data, &message.attributes)
            .await?;
        debug!("published: {} to {}", id, topic);
        Ok(id)
    }
}
