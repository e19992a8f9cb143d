use grin_config::AdapterConfig;
use serde::{Deserialize, Serialize};

/// Static health record for the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
  pub state: String,
  pub message: String,
  pub version: String,
  pub source_url: String,
  pub source_commit: String,
}

pub fn status(config: &AdapterConfig) -> Status {
  Status {
    state: "OK".to_string(),
    message: String::new(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    source_url: config.source_url.clone(),
    source_commit: config.source_commit.clone(),
  }
}
