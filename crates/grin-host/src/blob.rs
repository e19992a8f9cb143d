use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::{BlobId, BlobStore, HostError, not_found_or_io};

/// Filesystem-based blob store.
///
/// Each uploaded file is streamed to `{base_path}/{id}` where `id` is a fresh
/// UUID. The base directory is created on first upload.
pub struct FsBlobStore {
  base_path: PathBuf,
}

impl FsBlobStore {
  /// Create a new blob store with the given base path.
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  /// Location of a stored blob.
  pub fn path(&self, id: &BlobId) -> PathBuf {
    self.base_path.join(&id.0)
  }
}

#[async_trait]
impl BlobStore for FsBlobStore {
  async fn upload(&self, path: &Path) -> Result<BlobId, HostError> {
    let source = File::open(path)
      .await
      .map_err(|e| not_found_or_io(e, &path.display().to_string()))?;

    fs::create_dir_all(&self.base_path).await?;

    let id = BlobId(uuid::Uuid::new_v4().to_string());
    let mut dest = File::create(self.path(&id)).await?;
    let mut stream = ReaderStream::new(source);

    while let Some(chunk) = stream.next().await {
      dest.write_all(&chunk?).await?;
    }
    dest.flush().await?;

    debug!(blob_id = %id, source = %path.display(), "blob stored");
    Ok(id)
  }
}
