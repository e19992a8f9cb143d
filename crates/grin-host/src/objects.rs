use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::{HostError, ObjectData, ObjectStore, not_found_or_io};

/// Filesystem-based object store.
///
/// An object with reference `12/3/1` is read from `{root}/12/3/1.json`:
/// ```json
/// { "info": { "name": "drought_genes", "type": "FeatureSet" }, "data": { ... } }
/// ```
pub struct FsObjectStore {
  root: PathBuf,
}

impl FsObjectStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn object_path(&self, reference: &str) -> Option<PathBuf> {
    let segments: Vec<&str> = reference.split('/').collect();
    let valid = segments
      .iter()
      .all(|s| !s.is_empty() && *s != "." && *s != ".." && !s.contains('\\'));
    if !valid {
      return None;
    }

    let (last, parents) = segments.split_last()?;
    let mut path = self.root.clone();
    for segment in parents {
      path.push(segment);
    }
    path.push(format!("{}.json", last));
    Some(path)
  }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
  async fn get_object(&self, reference: &str) -> Result<ObjectData, HostError> {
    let path = self
      .object_path(reference)
      .ok_or_else(|| HostError::NotFound(reference.to_string()))?;

    let content = fs::read_to_string(&path)
      .await
      .map_err(|e| not_found_or_io(e, reference))?;

    Ok(serde_json::from_str(&content)?)
  }
}
