pub mod envelope;
pub mod types;

pub use envelope::{decode_pubsub_message, decode_storage_event};
pub use types::{
    StorageFinalizeEvent, TranslationRequest, TranslationResult, MAX_ATTRIBUTE_VALUE_BYTES,
};
