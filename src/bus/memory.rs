use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use super::interface::{OutboundMessage, Publisher};

/// In-process bus that keeps every published message per topic, in order.
///
/// Nothing is delivered anywhere; useful for dry runs and for tests.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    topics: DashMap<String, Vec<OutboundMessage>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published to `topic` so far, oldest first
    #[cfg(test)]
    pub fn messages(&self, topic: &str) -> Vec<OutboundMessage> {
        self.topics
            .get(topic)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.topics.iter().map(|e| e.value().len()).sum()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(
        &self,
        topic: &str,
        message: OutboundMessage,
    ) -> Result<String, anyhow::Error> {
        let id = Uuid::new_v4().to_string();
        info!(
            "memory bus: {} on {} ({} bytes, {} attributes)",
            id,
            topic,
            message.data.len(),
            message.attributes.len()
        );
        self.topics.entry(topic.to_string()).or_default().push(message);
        Ok(id)
    }
}
