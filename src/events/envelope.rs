//! Decoding of push deliveries into the records the stages work with.
//!
//! Bodies arrive either as CloudEvents in structured mode (the record sits
//! under `data`) or in binary mode, where the body already is the data.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::types::{StorageFinalizeEvent, StorageObjectData};
use crate::error::PipelineError;

/// A single Pub/Sub message as found in push and Eventarc deliveries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PubsubMessage {
    /// Base64 encoded body
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, rename = "messageId", alias = "message_id")]
    pub message_id: Option<String>,
    #[serde(default, rename = "publishTime", alias = "publish_time")]
    pub publish_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePublishedData {
    pub message: PubsubMessage,
}

impl PubsubMessage {
    /// Decoded body, `None` when the message carries attributes only
    pub fn payload(&self) -> Result<Option<Vec<u8>>, PipelineError> {
        match self.data.as_deref() {
            None | Some("") => Ok(None),
            Some(encoded) => STANDARD
                .decode(encoded)
                .map(Some)
                .map_err(|e| PipelineError::Decode(format!("message data is not base64: {}", e))),
        }
    }

    /// Decode a `{text, filename, lang}` record.
    ///
    /// The JSON body is authoritative; attributes are only consulted when the
    /// message has no body.
    pub fn decode_record<T: DeserializeOwned>(&self) -> Result<T, PipelineError> {
        match self.payload()? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                let attributes = serde_json::to_value(&self.attributes)?;
                Ok(serde_json::from_value(attributes)?)
            }
        }
    }
}

/// Parse a body and strip a structured-mode CloudEvent wrapper if present
pub fn unwrap_cloud_event(body: &[u8]) -> Result<Value, PipelineError> {
    let value: Value = serde_json::from_slice(body)?;
    match value {
        Value::Object(mut obj) if obj.contains_key("specversion") => obj
            .remove("data")
            .ok_or_else(|| PipelineError::Decode("cloud event carries no data".to_string())),
        other => Ok(other),
    }
}

pub fn decode_storage_event(body: &[u8]) -> Result<StorageFinalizeEvent, PipelineError> {
    let data: StorageObjectData = serde_json::from_value(unwrap_cloud_event(body)?)?;
    debug!(
        "storage event {}/{}: generation {:?}, type {:?}, created {:?}, updated {:?}",
        data.bucket,
        data.name,
        data.metageneration,
        data.content_type,
        data.time_created,
        data.updated
    );
    StorageFinalizeEvent::try_from(data)
}

pub fn decode_pubsub_message(body: &[u8]) -> Result<PubsubMessage, PipelineError> {
    let published: MessagePublishedData = serde_json::from_value(unwrap_cloud_event(body)?)?;
    let message = published.message;
    debug!(
        "push delivery {:?} published at {:?}",
        message.message_id, message.publish_time
    );
    Ok(message)
}
