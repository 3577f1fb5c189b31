//! Save: translation result -> `<filename>_to_<lang>.txt` in the result bucket.

use tracing::info;

use crate::error::PipelineError;
use crate::events::{decode_pubsub_message, TranslationResult};
use crate::state::AppState;

pub const RESULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Deterministic result object name. Rewriting it is how redelivery stays harmless.
pub fn result_object_name(filename: &str, lang: &str) -> String {
    format!("{}_to_{}.txt", filename, lang)
}

pub async fn handle_translation_result(
    state: &AppState,
    result: TranslationResult,
) -> Result<String, PipelineError> {
    let bucket = &state.config.pipeline_config.result_bucket;
    let name = result_object_name(&result.filename, &result.lang);
    info!("Saving {} to {}", name, bucket);

    state
        .object_store
        .write_object(bucket, &name, result.text.into_bytes(), RESULT_CONTENT_TYPE)
        .await
        .map_err(|e| PipelineError::collaborator("storage", e))?;
    info!("saved: gs://{}/{}", bucket, name);

    Ok(name)
}

/// Entry point for a raw push delivery
pub async fn handle_translation_result_push(
    state: &AppState,
    body: &[u8],
) -> Result<String, PipelineError> {
    let message = decode_pubsub_message(body)?;
    let result: TranslationResult = message.decode_record()?;
    handle_translation_result(state, result).await
}
