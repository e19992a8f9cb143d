//! Adapter error types.

use std::time::Duration;

use grin_config::ConfigError;
use grin_host::HostError;

/// Errors that can occur during a GRIN run.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
  /// A required parameter was absent.
  #[error("{name} is required")]
  MissingParameter { name: String },

  /// A parameter could not be interpreted.
  #[error("invalid value for {name}: {message}")]
  InvalidParameter { name: String, message: String },

  /// A referenced input file does not resolve to a local file.
  #[error("invalid input: {message}")]
  InvalidInput { message: String },

  /// A referenced object does not exist in the object store.
  #[error("object not found: {reference}")]
  NotFound { reference: String },

  /// A referenced gene-set object yielded no feature identifiers.
  #[error("gene set '{reference}' contains no feature identifiers")]
  EmptySet { reference: String },

  /// The external tool could not be started.
  #[error("failed to start '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The external tool exited unsuccessfully. `output` is the full merged
  /// stdout and stderr.
  #[error("command failed ({}):\n{output}", describe_exit(.code))]
  ExecutionFailed { code: Option<i32>, output: String },

  /// The external tool exceeded the configured timeout and was killed.
  #[error("command timed out after {limit:?}:\n{output}")]
  Timeout { limit: Duration, output: String },

  /// Adapter configuration could not be loaded.
  #[error(transparent)]
  Config(ConfigError),

  /// The HTML summary could not be rendered.
  #[error("failed to render summary: {0}")]
  Template(#[from] minijinja::Error),

  /// A host service call failed.
  #[error("host service error: {0}")]
  Host(#[from] HostError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "terminated by signal".to_string(),
  }
}

impl AdapterError {
  pub fn invalid_input(message: impl Into<String>) -> Self {
    Self::InvalidInput {
      message: message.into(),
    }
  }
}

impl From<ConfigError> for AdapterError {
  fn from(e: ConfigError) -> Self {
    match e {
      ConfigError::MissingParameter { name } => Self::MissingParameter { name },
      ConfigError::InvalidParameter { name, message } => Self::InvalidParameter { name, message },
      other => Self::Config(other),
    }
  }
}
