//! GRIN Host
//!
//! This crate defines the host platform services the GRIN adapter talks to,
//! and local filesystem implementations of each.
//!
//! The adapter never reaches the platform directly. It goes through five
//! traits:
//! - [`StagingService`] materializes user-uploaded files locally.
//! - [`ObjectStore`] fetches typed data objects (gene sets) by reference.
//! - [`BlobStore`] stores a local file and returns an opaque [`BlobId`].
//! - [`FilePacker`] compresses a directory into a single archive.
//! - [`ReportService`] registers the final report record.
//!
//! [`HostServices`] bundles one implementation of each. The `Fs*` types back
//! every service with a directory tree, which is what the CLI and the tests
//! use.

mod blob;
mod objects;
mod pack;
mod report;
mod staging;

pub use blob::FsBlobStore;
pub use objects::FsObjectStore;
pub use pack::TarGzPacker;
pub use report::FsReportService;
pub use staging::FsStaging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for host service calls.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
  /// The requested file, object or blob does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored record could not be read or written.
  #[error("invalid record: {0}")]
  Json(#[from] serde_json::Error),

  /// The service rejected the request.
  #[error("service error: {message}")]
  Service { message: String },
}

impl HostError {
  pub fn service(message: impl Into<String>) -> Self {
    Self::Service {
      message: message.into(),
    }
  }
}

/// Opaque identifier returned by the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(pub String);

impl std::fmt::Display for BlobId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default, rename = "type")]
  pub type_name: Option<String>,
}

/// A typed object as returned by the object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
  pub info: ObjectInfo,
  pub data: serde_json::Value,
}

/// A link from a report to an uploaded blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLink {
  pub blob_id: BlobId,
  pub name: String,
  pub label: String,
}

/// The report to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSpec {
  pub workspace_name: String,
  pub message: String,
  /// Index into `html_links` of the link to open by default.
  pub direct_html_link_index: Option<usize>,
  pub html_links: Vec<ReportLink>,
  pub file_links: Vec<ReportLink>,
}

/// Identifies a registered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInfo {
  pub name: String,
  #[serde(rename = "ref")]
  pub reference: String,
}

/// Materializes staged uploads as local files.
#[async_trait]
pub trait StagingService: Send + Sync {
  /// Copy the staged file at `subpath` to local storage and return its path.
  async fn download(&self, subpath: &str) -> Result<PathBuf, HostError>;
}

/// Typed object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
  /// Fetch an object's data and metadata by reference.
  async fn get_object(&self, reference: &str) -> Result<ObjectData, HostError>;
}

/// Blob storage for report artifacts.
#[async_trait]
pub trait BlobStore: Send + Sync {
  /// Store the file at `path`.
  async fn upload(&self, path: &Path) -> Result<BlobId, HostError>;
}

/// Compresses directories.
#[async_trait]
pub trait FilePacker: Send + Sync {
  /// Pack the contents of `dir` into a single archive at `dest`.
  async fn pack_dir(&self, dir: &Path, dest: &Path) -> Result<PathBuf, HostError>;

  /// File extension of archives this packer writes.
  fn extension(&self) -> &'static str;
}

/// Persists report records.
#[async_trait]
pub trait ReportService: Send + Sync {
  async fn create_report(&self, report: &ReportSpec) -> Result<ReportInfo, HostError>;
}

/// One implementation of every host service.
#[derive(Clone)]
pub struct HostServices {
  pub staging: Arc<dyn StagingService>,
  pub objects: Arc<dyn ObjectStore>,
  pub blobs: Arc<dyn BlobStore>,
  pub packer: Arc<dyn FilePacker>,
  pub reports: Arc<dyn ReportService>,
}

impl HostServices {
  /// Filesystem-backed services rooted at `root`.
  ///
  /// ```text
  /// {root}/
  /// ├── staging/   uploads, addressed by subpath
  /// ├── objects/   {ref}.json typed objects
  /// ├── blobs/     uploaded artifacts
  /// └── reports/   {workspace}/{name}.json
  /// ```
  ///
  /// Staged files are copied into `scratch`.
  pub fn local(root: &Path, scratch: &Path) -> Self {
    Self {
      staging: Arc::new(FsStaging::new(root.join("staging"), scratch)),
      objects: Arc::new(FsObjectStore::new(root.join("objects"))),
      blobs: Arc::new(FsBlobStore::new(root.join("blobs"))),
      packer: Arc::new(TarGzPacker),
      reports: Arc::new(FsReportService::new(root.join("reports"))),
    }
  }
}

/// Map a `NotFound` I/O error to [`HostError::NotFound`] with `what` as detail.
pub(crate) fn not_found_or_io(e: std::io::Error, what: &str) -> HostError {
  if e.kind() == std::io::ErrorKind::NotFound {
    HostError::NotFound(what.to_string())
  } else {
    HostError::Io(e)
  }
}
