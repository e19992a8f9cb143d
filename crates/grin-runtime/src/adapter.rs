//! The GRIN adapter.
//!
//! [`GrinAdapter`] is the entry point. `run_grin(params)` walks one run
//! through its stages in order:
//!
//! 1. validate parameters into a [`RunConfig`]
//! 2. resolve inputs to local files ([`InputResolver`])
//! 3. create the output directory and build the command
//! 4. run the tool ([`Executor`])
//! 5. write the HTML summary and package the report ([`ReportPackager`])
//!
//! Any failure ends the run. Nothing is rolled back; the output directory
//! stays in scratch for diagnosis.

use std::time::Duration;

use grin_config::{AdapterConfig, RunConfig, RunParams, sanitize_label};
use grin_host::HostServices;
use tracing::{error, info, instrument, warn};

use crate::command::{build_command, prepare_output_dir};
use crate::error::AdapterError;
use crate::executor::Executor;
use crate::html::write_summary;
use crate::packager::{ReportPackager, ReportResult};
use crate::resolver::InputResolver;
use crate::status::{Status, status};

/// File in the output directory that receives the tool's merged output.
pub const LOG_FILE: &str = "grin.log";

pub struct GrinAdapter {
  config: AdapterConfig,
  host: HostServices,
}

impl GrinAdapter {
  pub fn new(config: AdapterConfig, host: HostServices) -> Self {
    Self { config, host }
  }

  pub fn status(&self) -> Status {
    status(&self.config)
  }

  /// Run GRIN once and return the created report as a one-element list.
  #[instrument(
    name = "run_grin",
    skip(self, params),
    fields(workspace = params.workspace_name.as_deref().unwrap_or_default())
  )]
  pub async fn run_grin(&self, params: &RunParams) -> Result<Vec<ReportResult>, AdapterError> {
    let config = RunConfig::from_params(params)?;

    let has_ref = params
      .feature_set_ref
      .as_deref()
      .is_some_and(|s| !s.trim().is_empty());
    let has_tsv = params
      .geneset_tsv_path
      .as_deref()
      .is_some_and(|s| !s.trim().is_empty());
    if has_ref && has_tsv {
      warn!("both feature_set_ref and geneset_tsv_path given; using feature_set_ref");
    }

    info!(label = %config.output_label, "grin_started");

    let result = self.run_inner(&config).await;

    match &result {
      Ok(reports) => {
        if let Some(report) = reports.first() {
          info!(report_ref = %report.report_ref, "grin_completed");
        }
      }
      Err(e) => {
        error!(error = %e, "grin_failed");
      }
    }

    result
  }

  async fn run_inner(&self, config: &RunConfig) -> Result<Vec<ReportResult>, AdapterError> {
    let resolver = InputResolver::new(
      self.host.staging.clone(),
      self.host.objects.clone(),
      &self.config.scratch,
      &self.config.default_geneset_name,
    );
    let inputs = resolver.resolve(config).await?;

    let label = sanitize_label(&config.output_label);
    let output_dir = prepare_output_dir(&self.config.scratch, &label).await?;

    let command = build_command(&self.config.tool, config, &inputs, &output_dir)?;
    info!(command = %command, output_dir = %output_dir.display(), "command_built");

    let executor = Executor::new(self.config.timeout_secs.map(Duration::from_secs));
    let log = executor.run(&command, &output_dir.join(LOG_FILE)).await?;

    let html_dir = output_dir.join(&self.config.html_dir);
    write_summary(&html_dir, &command.to_string(), &log).await?;

    let packager = ReportPackager::new(
      self.host.clone(),
      &self.config.scratch,
      self.config.attachments.clone(),
    );
    let report = packager
      .package(
        &config.workspace_name,
        &output_dir,
        Some(html_dir.as_path()),
        &format!("GRIN completed: {}", label),
      )
      .await?;

    Ok(vec![report])
  }
}
