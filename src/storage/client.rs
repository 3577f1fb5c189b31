use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::interface::ObjectStore;
use crate::google_service::GoogleServiceClient;

/// Object store backed by Cloud Storage
pub struct GcsObjectStore {
    google_service: Arc<GoogleServiceClient>,
}

impl GcsObjectStore {
    pub fn new(google_service: Arc<GoogleServiceClient>) -> Self {
        Self { google_service }
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn write_object(
        &self,
        bucket: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), anyhow::Error> {
        debug!("Uploading gs://{}/{} ({} bytes)", bucket, name, body.len());
        self.google_service
            .upload_object(bucket, name, body, content_type)
            .await
    }
}
