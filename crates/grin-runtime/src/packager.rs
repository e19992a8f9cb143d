//! Report packaging.
//!
//! Collects whatever the tool left in its output directory, uploads it to the
//! host blob store and registers a single report. Missing outputs are skipped,
//! never errors.

use std::path::{Path, PathBuf};

use grin_host::{HostServices, ReportLink, ReportSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::AdapterError;

/// Identifies the report created for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
  pub report_name: String,
  pub report_ref: String,
}

pub struct ReportPackager {
  host: HostServices,
  scratch: PathBuf,
  attachments: Vec<String>,
}

impl ReportPackager {
  /// `attachments` is the allow-list of flat output file names to attach.
  pub fn new(host: HostServices, scratch: impl Into<PathBuf>, attachments: Vec<String>) -> Self {
    Self {
      host,
      scratch: scratch.into(),
      attachments,
    }
  }

  /// Upload the run's artifacts and describe the report, without registering it.
  pub async fn build_report(
    &self,
    workspace_name: &str,
    output_dir: &Path,
    html_dir: Option<&Path>,
    message: &str,
  ) -> Result<ReportSpec, AdapterError> {
    let mut html_links = Vec::new();
    if let Some(dir) = html_dir
      && tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir())
    {
      tokio::fs::create_dir_all(&self.scratch).await?;
      let archive = self.scratch.join(format!(
        "{}.{}",
        uuid::Uuid::new_v4(),
        self.host.packer.extension()
      ));
      self.host.packer.pack_dir(dir, &archive).await?;
      let blob_id = self.host.blobs.upload(&archive).await?;
      debug!(blob_id = %blob_id, archive = %archive.display(), "html bundle uploaded");

      html_links.push(ReportLink {
        blob_id,
        name: "index.html".to_string(),
        label: "Open report".to_string(),
      });
    }

    let mut file_links = Vec::new();
    for name in &self.attachments {
      let path = output_dir.join(name);
      if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        continue;
      }
      let blob_id = self.host.blobs.upload(&path).await?;
      debug!(blob_id = %blob_id, file = %name, "attachment uploaded");

      file_links.push(ReportLink {
        blob_id,
        name: name.clone(),
        label: name.clone(),
      });
    }

    Ok(ReportSpec {
      workspace_name: workspace_name.to_string(),
      message: message.to_string(),
      direct_html_link_index: if html_links.is_empty() { None } else { Some(0) },
      html_links,
      file_links,
    })
  }

  /// Upload the run's artifacts and register the report.
  #[instrument(
    name = "grin_package",
    skip(self, output_dir, html_dir, message),
    fields(output_dir = %output_dir.display())
  )]
  pub async fn package(
    &self,
    workspace_name: &str,
    output_dir: &Path,
    html_dir: Option<&Path>,
    message: &str,
  ) -> Result<ReportResult, AdapterError> {
    let report = self
      .build_report(workspace_name, output_dir, html_dir, message)
      .await?;

    let info = self.host.reports.create_report(&report).await?;

    info!(
      report_ref = %info.reference,
      html = !report.html_links.is_empty(),
      attachments = report.file_links.len(),
      "report registered"
    );

    Ok(ReportResult {
      report_name: info.name,
      report_ref: info.reference,
    })
  }
}
