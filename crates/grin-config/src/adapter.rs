//! Adapter-level configuration, injected at construction time.
//!
//! Loaded from a JSON file where every field is optional:
//!
//! ```json
//! {
//!   "scratch": "/kb/module/work/tmp",
//!   "tool": {
//!     "launcher": ["micromamba", "run", "-n", "grin", "Rscript"],
//!     "script": "/opt/GRIN/R/GRIN.R"
//!   },
//!   "timeout_secs": 86400
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How to launch the external GRIN tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
  /// Program followed by its leading arguments, e.g. an environment runner
  /// and the R interpreter.
  pub launcher: Vec<String>,

  /// The GRIN script passed as the first argument after the launcher.
  pub script: PathBuf,
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      launcher: ["micromamba", "run", "-n", "grin", "Rscript"]
        .into_iter()
        .map(String::from)
        .collect(),
      script: PathBuf::from("/opt/GRIN/R/GRIN.R"),
    }
  }
}

/// Configuration for the adapter itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
  /// Root of the per-run scratch area. Each run creates its own
  /// subdirectory here and never cleans it up.
  pub scratch: PathBuf,

  pub tool: ToolConfig,

  /// Flat output files attached to the report when the tool produces them.
  pub attachments: Vec<String>,

  /// Name of the HTML subdirectory inside the tool's output directory.
  pub html_dir: String,

  /// Set name used for a gene set when neither a hint nor an object name
  /// is available.
  pub default_geneset_name: String,

  /// Kill the tool after this many seconds. `None` waits indefinitely.
  pub timeout_secs: Option<u64>,

  pub source_url: String,
  pub source_commit: String,
}

impl Default for AdapterConfig {
  fn default() -> Self {
    Self {
      scratch: std::env::temp_dir().join("grin"),
      tool: ToolConfig::default(),
      attachments: [
        "retained_genes.txt",
        "removed_genes.txt",
        "duplicates.txt",
        "not_in_multiplex.txt",
      ]
      .into_iter()
      .map(String::from)
      .collect(),
      html_dir: "html".to_string(),
      default_geneset_name: "GRIN_geneset".to_string(),
      timeout_secs: None,
      source_url: env!("CARGO_PKG_REPOSITORY").to_string(),
      source_commit: option_env!("GRIN_SOURCE_COMMIT")
        .unwrap_or("unknown")
        .to_string(),
    }
  }
}

impl AdapterConfig {
  /// Default configuration rooted at the given scratch directory.
  pub fn with_scratch(scratch: impl Into<PathBuf>) -> Self {
    Self {
      scratch: scratch.into(),
      ..Self::default()
    }
  }

  /// Load configuration from a JSON file. Missing fields take defaults.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
  }
}
