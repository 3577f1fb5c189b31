use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Payload of a storage "object finalized" event, as delivered by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageObjectData {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metageneration: Option<String>,
    #[serde(default, rename = "contentType")]
    pub content_type: Option<String>,
    #[serde(default, rename = "timeCreated")]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}

/// The two fields Extract needs out of a storage event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFinalizeEvent {
    pub bucket_name: String,
    pub object_name: String,
}

impl StorageFinalizeEvent {
    pub fn new(bucket_name: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_name: object_name.into(),
        }
    }

    /// `gs://bucket/object` reference handed to the OCR collaborator
    pub fn image_uri(&self) -> String {
        format!("gs://{}/{}", self.bucket_name, self.object_name)
    }
}

impl TryFrom<StorageObjectData> for StorageFinalizeEvent {
    type Error = PipelineError;

    fn try_from(data: StorageObjectData) -> Result<Self, Self::Error> {
        if data.bucket.is_empty() || data.name.is_empty() {
            return Err(PipelineError::Decode(
                "storage event is missing bucket or object name".to_string(),
            ));
        }
        Ok(Self::new(data.bucket, data.name))
    }
}

/// Extract -> Translate. One per target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub filename: String,
    pub lang: String,
}

/// Largest attribute value Pub/Sub accepts, in bytes
pub const MAX_ATTRIBUTE_VALUE_BYTES: usize = 1024;

impl TranslationRequest {
    /// Message attributes `{text, filename, lang}`
    pub fn to_attributes(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("text".to_string(), self.text.clone()),
            ("filename".to_string(), self.filename.clone()),
            ("lang".to_string(), self.lang.clone()),
        ])
    }

    /// Attribute keys whose value is too long for the bus to accept
    pub fn oversized_attributes(&self) -> Vec<&'static str> {
        [
            ("text", &self.text),
            ("filename", &self.filename),
            ("lang", &self.lang),
        ]
        .into_iter()
        .filter(|(_, value)| value.len() > MAX_ATTRIBUTE_VALUE_BYTES)
        .map(|(key, _)| key)
        .collect()
    }
}

/// Translate -> Save. Same shape as the request, `text` is now translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
    pub filename: String,
    pub lang: String,
}
