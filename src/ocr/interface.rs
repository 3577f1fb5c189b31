use async_trait::async_trait;
use futures::Stream;

/// Lazy, finite sequence of detected text fragments
pub type FragmentStream = Box<dyn Stream<Item = Result<String, anyhow::Error>> + Send + Unpin>;

/// Text detection over an image that already lives in object storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Detect text in the image at `image_uri` (`gs://bucket/object`).
    ///
    /// An image without text yields an empty stream, not an error.
    async fn detect_texts(&self, image_uri: &str) -> Result<FragmentStream, anyhow::Error>;
}
