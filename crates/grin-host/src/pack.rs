use std::fs::File;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::{FilePacker, HostError};

/// Packs a directory into a gzip-compressed tarball.
///
/// Entries are stored relative to the packed directory, so `dir/index.html`
/// lands at the archive root.
pub struct TarGzPacker;

impl TarGzPacker {
  fn pack_blocking(dir: &Path, dest: &Path) -> Result<(), HostError> {
    if !dir.is_dir() {
      return Err(HostError::NotFound(dir.display().to_string()));
    }

    let file = File::create(dest)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", dir)?;
    builder.into_inner()?.finish()?;
    Ok(())
  }
}

#[async_trait]
impl FilePacker for TarGzPacker {
  async fn pack_dir(&self, dir: &Path, dest: &Path) -> Result<PathBuf, HostError> {
    let dir = dir.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<PathBuf, HostError> {
      Self::pack_blocking(&dir, &dest)?;
      Ok(dest)
    })
    .await
    .map_err(|e| HostError::service(format!("packing task failed: {}", e)))?
  }

  fn extension(&self) -> &'static str {
    "tar.gz"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use flate2::read::GzDecoder;

  #[tokio::test]
  async fn test_pack_dir() {
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("html");
    std::fs::create_dir_all(html.join("plots")).unwrap();
    std::fs::write(html.join("index.html"), "<h2>done</h2>").unwrap();
    std::fs::write(html.join("plots/rank.svg"), "<svg/>").unwrap();

    let dest = dir.path().join("report.tar.gz");
    let packed = TarGzPacker.pack_dir(&html, &dest).await.unwrap();
    assert_eq!(packed, dest);

    let mut archive = tar::Archive::new(GzDecoder::new(File::open(&dest).unwrap()));
    let names: Vec<String> = archive
      .entries()
      .unwrap()
      .map(|e| e.unwrap().path().unwrap().display().to_string())
      .collect();

    assert!(names.iter().any(|n| n.ends_with("index.html")));
    assert!(names.iter().any(|n| n.ends_with("plots/rank.svg")));
  }

  #[tokio::test]
  async fn test_pack_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let err = TarGzPacker
      .pack_dir(&dir.path().join("absent"), &dir.path().join("x.tar.gz"))
      .await
      .unwrap_err();
    assert!(matches!(err, HostError::NotFound(_)));
  }
}
