use async_trait::async_trait;

/// Write side of object storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` as the full content of `bucket/name`.
    ///
    /// An existing object with the same name is replaced.
    async fn write_object(
        &self,
        bucket: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), anyhow::Error>;
}
