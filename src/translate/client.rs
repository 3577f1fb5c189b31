use std::sync::Arc;

use async_trait::async_trait;

use super::interface::Translator;
use super::language::SupportedLanguage;
use crate::google_service::GoogleServiceClient;

/// Translator backed by the Cloud Translation API
pub struct GoogleTranslator {
    google_service: Arc<GoogleServiceClient>,
}

impl GoogleTranslator {
    pub fn new(google_service: Arc<GoogleServiceClient>) -> Self {
        Self { google_service }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        target: SupportedLanguage,
    ) -> Result<String, anyhow::Error> {
        self.google_service.translate(text, target.tag()).await
    }
}
