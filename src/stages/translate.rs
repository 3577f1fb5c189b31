//! Translate: translation request -> translated text -> result topic.
//!
//! A redelivered request is translated and published again; Save tolerates the
//! duplicate because it overwrites.

use tracing::{info, warn};

use crate::bus::OutboundMessage;
use crate::error::PipelineError;
use crate::events::{decode_pubsub_message, TranslationRequest, TranslationResult};
use crate::state::AppState;
use crate::translate::SupportedLanguage;

pub async fn handle_translation_request(
    state: &AppState,
    request: TranslationRequest,
) -> Result<TranslationResult, PipelineError> {
    info!("Translating text into {} for {}", request.lang, request.filename);

    let target = SupportedLanguage::parse(&request.lang).map_err(|e| {
        warn!("Rejecting request for {}: {}", request.filename, e);
        e
    })?;

    let translated = state
        .translator
        .translate(&request.text, target)
        .await
        .map_err(|e| PipelineError::collaborator("translate", e))?;
    info!("translated: {} -> {}", request.filename, target);

    let result = TranslationResult {
        text: translated,
        filename: request.filename,
        lang: request.lang,
    };

    let topic = &state.config.pipeline_config.result_topic;
    let id = state
        .publisher
        .publish(topic, OutboundMessage::json(&result)?)
        .await
        .map_err(|e| PipelineError::collaborator("pubsub", e))?;
    info!("published: {} to {}", id, topic);

    Ok(result)
}

/// Entry point for a raw push delivery
pub async fn handle_translation_push(
    state: &AppState,
    body: &[u8],
) -> Result<TranslationResult, PipelineError> {
    let message = decode_pubsub_message(body)?;
    let request: TranslationRequest = message.decode_record()?;
    handle_translation_request(state, request).await
}
