use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::client::VisionTextDetector;
use super::interface::TextDetector;
use crate::config_manager::ServiceConfig;
use crate::google_service::GoogleServiceClient;

/// Factory for creating text detectors
pub struct OcrFactory;

impl OcrFactory {
    /// Create a text detector based on configuration
    ///
    /// # Arguments
    /// * `service_config` - Collaborator configuration
    /// * `google_service` - Shared client for the Google APIs
    pub fn create_detector(
        service_config: &ServiceConfig,
        google_service: Arc<GoogleServiceClient>,
    ) -> Result<Arc<dyn TextDetector>> {
        info!("Initializing OCR backend: {}", service_config.ocr_backend);

        match service_config.ocr_backend.as_str() {
            "vision" => Ok(Arc::new(VisionTextDetector::new(
                google_service,
                service_config.vision_max_results,
            ))),
            other => Err(anyhow::anyhow!("Unsupported OCR backend: {}", other)),
        }
    }
}
