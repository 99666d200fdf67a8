use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Storage for uploaded image files, addressed by generated filename.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, filename: &str, data: &[u8]) -> Result<()>;

    async fn remove(&self, filename: &str) -> Result<()>;
}

/// Writes blobs as plain files inside a single directory.
#[derive(Debug, Clone)]
pub struct DiskBlobStore {
    root: PathBuf,
}

impl DiskBlobStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        tracing::info!("Blob store ready at {}", root.display());

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn put(&self, filename: &str, data: &[u8]) -> Result<()> {
        tokio::fs::write(self.root.join(filename), data).await?;
        Ok(())
    }

    async fn remove(&self, filename: &str) -> Result<()> {
        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Builds a storage name from 32 random hex characters plus the original
/// file's extension.
pub fn generate_filename(original_name: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();

    match extension_of(original_name) {
        Some(ext) => format!("{}.{}", token, ext),
        None => token,
    }
}

// Extensions that are not plain alphanumerics are dropped.
fn extension_of(original_name: &str) -> Option<&str> {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}
