use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::interface::ObjectStore;

/// Object store on the local filesystem: `bucket/name` lands at `{root}/{bucket}/{name}`
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve an object to a path below the root. Names may contain `/`
    /// but never climb out of the bucket directory.
    pub fn object_path(&self, bucket: &str, name: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if bucket.is_empty() || name.is_empty() || escapes {
            anyhow::bail!("Invalid object path: {}/{}", bucket, name);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn write_object(
        &self,
        bucket: &str,
        name: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), anyhow::Error> {
        let path = self.object_path(bucket, name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
