use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::{HostError, ReportInfo, ReportService, ReportSpec};

/// Filesystem-based report service.
///
/// Reports are written to `{root}/{workspace}/{name}.json` and referenced as
/// `{workspace}/{name}`.
pub struct FsReportService {
  root: PathBuf,
}

#[derive(Serialize)]
struct StoredReport<'a> {
  name: &'a str,
  #[serde(rename = "ref")]
  reference: &'a str,
  #[serde(flatten)]
  report: &'a ReportSpec,
}

impl FsReportService {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Path a report reference is stored at.
  pub fn report_path(&self, reference: &str) -> PathBuf {
    self.root.join(format!("{}.json", reference))
  }
}

#[async_trait]
impl ReportService for FsReportService {
  async fn create_report(&self, report: &ReportSpec) -> Result<ReportInfo, HostError> {
    let workspace = report.workspace_name.as_str();
    if workspace.is_empty() || workspace.contains(['/', '\\']) || workspace.starts_with('.') {
      return Err(HostError::service(format!(
        "invalid workspace name '{}'",
        workspace
      )));
    }

    let name = format!("report_{}", uuid::Uuid::new_v4());
    let reference = format!("{}/{}", workspace, name);

    let path = self.report_path(&reference);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).await?;
    }

    let stored = StoredReport {
      name: &name,
      reference: &reference,
      report,
    };
    fs::write(&path, serde_json::to_vec_pretty(&stored)?).await?;

    info!(report_ref = %reference, "report created");
    Ok(ReportInfo { name, reference })
  }
}
