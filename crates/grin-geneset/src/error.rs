/// Errors that can occur while building a gene set.
#[derive(Debug, thiserror::Error)]
pub enum GeneSetError {
  /// No feature identifiers were found in the source object.
  #[error("no feature identifiers found in gene set '{name}'")]
  EmptySet { name: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
