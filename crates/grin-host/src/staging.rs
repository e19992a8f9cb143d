use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::{HostError, StagingService, not_found_or_io};

/// Filesystem-based staging area.
///
/// Staged uploads live under `{root}/{subpath}`. A download copies the file
/// into `{scratch}/staging-{uuid}/{file name}` so the caller owns its copy.
pub struct FsStaging {
  root: PathBuf,
  scratch: PathBuf,
}

impl FsStaging {
  pub fn new(root: impl Into<PathBuf>, scratch: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      scratch: scratch.into(),
    }
  }

  /// Resolve a subpath inside the staging root, rejecting escapes.
  fn staged_path(&self, subpath: &str) -> Result<PathBuf, HostError> {
    let relative = Path::new(subpath.trim_start_matches('/'));
    let escapes = relative
      .components()
      .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || relative.as_os_str().is_empty() {
      return Err(HostError::NotFound(subpath.to_string()));
    }
    Ok(self.root.join(relative))
  }
}

#[async_trait]
impl StagingService for FsStaging {
  async fn download(&self, subpath: &str) -> Result<PathBuf, HostError> {
    let source = self.staged_path(subpath)?;
    let file_name = source
      .file_name()
      .ok_or_else(|| HostError::NotFound(subpath.to_string()))?;

    let metadata = fs::metadata(&source)
      .await
      .map_err(|e| not_found_or_io(e, subpath))?;
    if !metadata.is_file() {
      return Err(HostError::NotFound(subpath.to_string()));
    }

    let target_dir = self
      .scratch
      .join(format!("staging-{}", uuid::Uuid::new_v4().simple()));
    fs::create_dir_all(&target_dir).await?;

    let target = target_dir.join(file_name);
    fs::copy(&source, &target)
      .await
      .map_err(|e| not_found_or_io(e, subpath))?;

    debug!(subpath = %subpath, path = %target.display(), "staged file copied");
    Ok(target)
  }
}
