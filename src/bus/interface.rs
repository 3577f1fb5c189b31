use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

/// A message as handed to the bus: opaque body plus string attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    pub data: Vec<u8>,
    pub attributes: BTreeMap<String, String>,
}

impl OutboundMessage {
    /// Message whose body is `record` serialized as JSON
    pub fn json<T: Serialize>(record: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            data: serde_json::to_vec(record)?,
            attributes: BTreeMap::new(),
        })
    }

    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    #[cfg(test)]
    pub fn decode_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.data)
    }
}

/// Publishing side of the message bus
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `message` to `topic` and wait for the broker to accept it.
    ///
    /// Returns the broker assigned message id.
    async fn publish(
        &self,
        topic: &str,
        message: OutboundMessage,
    ) -> Result<String, anyhow::Error>;
}
