use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::interface::{FragmentStream, TextDetector};
use crate::google_service::GoogleServiceClient;

/// Text detection backed by the Cloud Vision API
pub struct VisionTextDetector {
    google_service: Arc<GoogleServiceClient>,
    max_results: u32,
}

impl VisionTextDetector {
    pub fn new(google_service: Arc<GoogleServiceClient>, max_results: u32) -> Self {
        Self {
            google_service,
            max_results,
        }
    }
}

#[async_trait]
impl TextDetector for VisionTextDetector {
    async fn detect_texts(&self, image_uri: &str) -> Result<FragmentStream, anyhow::Error> {
        let texts = self
            .google_service
            .detect_texts(image_uri, self.max_results)
            .await?;
        debug!("detected texts: {:?}", texts);

        Ok(Box::new(futures::stream::iter(texts.into_iter().map(Ok))))
    }
}
