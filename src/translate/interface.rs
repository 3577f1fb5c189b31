use async_trait::async_trait;

use super::language::SupportedLanguage;

/// Machine translation with automatic source language detection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target`
    async fn translate(
        &self,
        text: &str,
        target: SupportedLanguage,
    ) -> Result<String, anyhow::Error>;
}
