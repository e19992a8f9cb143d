//! Input resolution.
//!
//! Turns the run's input selectors into local files the tool can read:
//! - a path that already exists locally is used as-is;
//! - anything else is treated as a staging subpath and downloaded;
//! - a gene-set object reference is fetched and written out as TSV.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use grin_config::{InputSelector, RunConfig, sanitize_label};
use grin_geneset::{GeneSet, GeneSetError};
use grin_host::{HostError, ObjectStore, StagingService};
use tracing::{info, instrument};

use crate::command::ResolvedInputs;
use crate::error::AdapterError;

pub struct InputResolver {
  staging: Arc<dyn StagingService>,
  objects: Arc<dyn ObjectStore>,
  scratch: PathBuf,
  default_geneset_name: String,
}

impl InputResolver {
  pub fn new(
    staging: Arc<dyn StagingService>,
    objects: Arc<dyn ObjectStore>,
    scratch: impl Into<PathBuf>,
    default_geneset_name: impl Into<String>,
  ) -> Self {
    Self {
      staging,
      objects,
      scratch: scratch.into(),
      default_geneset_name: default_geneset_name.into(),
    }
  }

  /// Resolve both tool inputs for a run.
  pub async fn resolve(&self, config: &RunConfig) -> Result<ResolvedInputs, AdapterError> {
    let geneset = match &config.input {
      InputSelector::StagedTsv(selector) => self.resolve_path("geneset_tsv_path", selector).await?,
      InputSelector::FeatureSetRef {
        reference,
        name_hint,
      } => {
        self
          .materialize_feature_set(reference, name_hint.as_deref())
          .await?
      }
    };

    let multiplex = self
      .resolve_path("multiplex_rdata_path", &config.multiplex_path)
      .await?;

    Ok(ResolvedInputs { geneset, multiplex })
  }

  /// Resolve a selector to an existing local file.
  ///
  /// `param` names the parameter the selector came from, for error messages.
  pub async fn resolve_path(&self, param: &str, selector: &str) -> Result<PathBuf, AdapterError> {
    if selector.trim().is_empty() {
      return Err(AdapterError::MissingParameter {
        name: param.to_string(),
      });
    }

    let local = Path::new(selector);
    if tokio::fs::try_exists(local).await.unwrap_or(false) {
      return Ok(std::path::absolute(local)?);
    }

    let staged = match self.staging.download(selector).await {
      Ok(path) => path,
      Err(HostError::NotFound(_)) => {
        return Err(AdapterError::invalid_input(format!(
          "{} '{}' is neither a local file nor a staged file",
          param, selector
        )));
      }
      Err(e) => return Err(e.into()),
    };

    if !tokio::fs::try_exists(&staged).await.unwrap_or(false) {
      return Err(AdapterError::invalid_input(format!(
        "{} '{}' was staged to {} but the file does not exist",
        param,
        selector,
        staged.display()
      )));
    }

    info!(param = %param, selector = %selector, path = %staged.display(), "input staged");
    Ok(staged)
  }

  /// Fetch a gene-set object and write it as a GRIN TSV in scratch.
  #[instrument(name = "materialize_feature_set", skip(self))]
  pub async fn materialize_feature_set(
    &self,
    reference: &str,
    name_hint: Option<&str>,
  ) -> Result<PathBuf, AdapterError> {
    let object = self
      .objects
      .get_object(reference)
      .await
      .map_err(|e| match e {
        HostError::NotFound(_) => AdapterError::NotFound {
          reference: reference.to_string(),
        },
        other => other.into(),
      })?;

    let name = [name_hint, object.info.name.as_deref()]
      .into_iter()
      .flatten()
      .map(str::trim)
      .find(|n| !n.is_empty())
      .unwrap_or(self.default_geneset_name.as_str())
      .replace(['\t', '\n', '\r'], " ");

    let gene_set = GeneSet::from_object(&name, &object.data)
      .map_err(|e| geneset_error(e, reference))?;

    tokio::fs::create_dir_all(&self.scratch).await?;
    let path = self.scratch.join(format!(
      "{}_{}.tsv",
      sanitize_label(&name),
      uuid::Uuid::new_v4().simple()
    ));
    gene_set
      .write_tsv(&path)
      .await
      .map_err(|e| geneset_error(e, reference))?;

    info!(
      set_name = %gene_set.name(),
      genes = gene_set.len(),
      path = %path.display(),
      "gene set materialized"
    );
    Ok(path)
  }
}

fn geneset_error(e: GeneSetError, reference: &str) -> AdapterError {
  match e {
    GeneSetError::EmptySet { .. } => AdapterError::EmptySet {
      reference: reference.to_string(),
    },
    GeneSetError::Io(e) => AdapterError::Io(e),
  }
}
