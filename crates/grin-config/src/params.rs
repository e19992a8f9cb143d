//! Run parameters.
//!
//! Callers hand over parameters the way a form would submit them: numbers may
//! arrive as strings, checkboxes as `0`/`1` or `"yes"`, and empty fields as
//! blank strings. [`RunParams`] accepts all of that; [`RunConfig`] is the
//! validated, typed view the adapter works with.
//!
//! ```json
//! {
//!   "workspace_name": "my_workspace",
//!   "geneset_tsv_path": "uploads/genes.tsv",
//!   "multiplex_rdata_path": "uploads/multiplex.Rdata",
//!   "restart": "0.5",
//!   "plot": 1
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::is_truthy;
use crate::error::ConfigError;

pub const DEFAULT_RESTART: f64 = 0.7;
pub const DEFAULT_TAU: &str = "1,1,1,1,1,1,1,1,1,1";
pub const DEFAULT_RUN_LABEL: &str = "run1";
pub const DEFAULT_OUTPUT_LABEL: &str = "GRIN";

/// Raw parameters for one `run_grin` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
  #[serde(default)]
  pub workspace_name: Option<String>,

  /// Reference to a typed gene-set object in the host object store.
  #[serde(default)]
  pub feature_set_ref: Option<String>,

  /// Display name for the gene set built from `feature_set_ref`.
  #[serde(default)]
  pub feature_set_name: Option<String>,

  /// Staging path (or local path) of a ready-made gene-set TSV.
  #[serde(default)]
  pub geneset_tsv_path: Option<String>,

  /// Staging path (or local path) of the multiplex network data.
  #[serde(default)]
  pub multiplex_rdata_path: Option<String>,

  #[serde(default)]
  pub restart: Option<Value>,
  #[serde(default)]
  pub tau_csv: Option<String>,
  #[serde(default)]
  pub run_label: Option<String>,
  #[serde(default)]
  pub verbosity: Option<Value>,
  #[serde(default)]
  pub plot: Option<Value>,
  #[serde(default)]
  pub simple_filenames: Option<Value>,
  #[serde(default)]
  pub output_name: Option<String>,
}

/// Where the gene set comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSelector {
  /// A typed object to be converted to TSV.
  FeatureSetRef {
    reference: String,
    name_hint: Option<String>,
  },
  /// A TSV that only needs to be located.
  StagedTsv(String),
}

/// Validated parameters for one run. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
  pub workspace_name: String,
  pub input: InputSelector,
  pub multiplex_path: String,
  pub restart: f64,
  pub tau_csv: String,
  pub run_label: String,
  pub verbosity: i64,
  pub plot: bool,
  pub simple_filenames: bool,
  /// Label used to name the output directory and the report message.
  pub output_label: String,
}

impl RunConfig {
  /// Validate raw parameters and fill in defaults.
  pub fn from_params(params: &RunParams) -> Result<Self, ConfigError> {
    let workspace_name =
      non_blank(&params.workspace_name).ok_or_else(|| ConfigError::missing("workspace_name"))?;

    let input = match (
      non_blank(&params.feature_set_ref),
      non_blank(&params.geneset_tsv_path),
    ) {
      (Some(reference), _) => InputSelector::FeatureSetRef {
        reference,
        name_hint: non_blank(&params.feature_set_name),
      },
      (None, Some(path)) => InputSelector::StagedTsv(path),
      (None, None) => return Err(ConfigError::missing("feature_set_ref or geneset_tsv_path")),
    };

    let multiplex_path = non_blank(&params.multiplex_rdata_path)
      .ok_or_else(|| ConfigError::missing("multiplex_rdata_path"))?;

    let restart = match present(&params.restart) {
      Some(value) => parse_f64("restart", value)?,
      None => DEFAULT_RESTART,
    };

    let verbosity = match present(&params.verbosity) {
      Some(value) => parse_i64("verbosity", value)?,
      None => 0,
    };

    let tau_csv = non_blank(&params.tau_csv).unwrap_or_else(|| DEFAULT_TAU.to_string());
    let run_label = non_blank(&params.run_label).unwrap_or_else(|| DEFAULT_RUN_LABEL.to_string());

    let output_label = non_blank(&params.output_name)
      .or_else(|| non_blank(&params.run_label))
      .unwrap_or_else(|| DEFAULT_OUTPUT_LABEL.to_string());

    Ok(Self {
      workspace_name,
      input,
      multiplex_path,
      restart,
      tau_csv,
      run_label,
      verbosity,
      plot: params.plot.as_ref().is_some_and(is_truthy),
      simple_filenames: params.simple_filenames.as_ref().is_none_or(is_truthy),
      output_label,
    })
  }
}

/// Trimmed value of an optional string, treating blank as absent.
fn non_blank(value: &Option<String>) -> Option<String> {
  value
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

/// An optional JSON value, treating `null` and blank strings as absent.
fn present(value: &Option<Value>) -> Option<&Value> {
  match value {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) if s.trim().is_empty() => None,
    Some(v) => Some(v),
  }
}

fn parse_f64(name: &str, value: &Value) -> Result<f64, ConfigError> {
  match value {
    Value::Number(n) => n
      .as_f64()
      .ok_or_else(|| ConfigError::invalid(name, format!("expected a number, got {}", n))),
    Value::String(s) => s
      .trim()
      .parse::<f64>()
      .map_err(|_| ConfigError::invalid(name, format!("expected a number, got '{}'", s))),
    other => Err(ConfigError::invalid(
      name,
      format!("expected a number, got {}", other),
    )),
  }
}

fn parse_i64(name: &str, value: &Value) -> Result<i64, ConfigError> {
  match value {
    Value::Number(n) => n
      .as_i64()
      .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
      .ok_or_else(|| ConfigError::invalid(name, format!("expected an integer, got {}", n))),
    Value::String(s) => s
      .trim()
      .parse::<i64>()
      .map_err(|_| ConfigError::invalid(name, format!("expected an integer, got '{}'", s))),
    Value::Bool(b) => Ok(i64::from(*b)),
    other => Err(ConfigError::invalid(
      name,
      format!("expected an integer, got {}", other),
    )),
  }
}
