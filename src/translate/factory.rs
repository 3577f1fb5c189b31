use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::client::GoogleTranslator;
use super::interface::Translator;
use crate::config_manager::ServiceConfig;
use crate::google_service::GoogleServiceClient;

/// Factory for creating translators
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(
        service_config: &ServiceConfig,
        google_service: Arc<GoogleServiceClient>,
    ) -> Result<Arc<dyn Translator>> {
        info!(
            "Initializing translation backend: {}",
            service_config.translate_backend
        );

        match service_config.translate_backend.as_str() {
            "google" => Ok(Arc::new(GoogleTranslator::new(google_service))),
            other => Err(anyhow::anyhow!("Unsupported translation backend: {}", other)),
        }
    }
}
