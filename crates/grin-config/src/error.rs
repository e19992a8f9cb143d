use thiserror::Error;

/// Errors raised while validating run parameters or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// A required parameter was absent or blank.
  #[error("{name} is required")]
  MissingParameter { name: String },

  /// A parameter was present but could not be interpreted.
  #[error("invalid value for {name}: {message}")]
  InvalidParameter { name: String, message: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid configuration: {0}")]
  Json(#[from] serde_json::Error),
}

impl ConfigError {
  pub fn missing(name: impl Into<String>) -> Self {
    Self::MissingParameter { name: name.into() }
  }

  pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidParameter {
      name: name.into(),
      message: message.into(),
    }
  }
}
