use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::GeneSetError;
use crate::shape::extract_feature_ids;

/// A named, de-duplicated set of feature identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneSet {
  name: String,
  ids: BTreeSet<String>,
}

impl GeneSet {
  /// Build a gene set from identifiers. Fails if there are none.
  pub fn new(
    name: impl Into<String>,
    ids: impl IntoIterator<Item = String>,
  ) -> Result<Self, GeneSetError> {
    let name = name.into();
    let ids: BTreeSet<String> = ids.into_iter().collect();
    if ids.is_empty() {
      return Err(GeneSetError::EmptySet { name });
    }
    Ok(Self { name, ids })
  }

  /// Build a gene set from a loosely-typed object payload.
  pub fn from_object(name: impl Into<String>, data: &Value) -> Result<Self, GeneSetError> {
    Self::new(name, extract_feature_ids(data))
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  /// Identifiers in ascending order.
  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.ids.iter().map(String::as_str)
  }

  /// Render as GRIN's two-column TSV, one `set_name\tfeature_id` line per
  /// identifier, sorted by identifier.
  pub fn to_tsv(&self) -> String {
    let mut out = String::new();
    for id in &self.ids {
      out.push_str(&self.name);
      out.push('\t');
      out.push_str(id);
      out.push('\n');
    }
    out
  }

  /// Write the TSV to `path`, creating or truncating it.
  pub async fn write_tsv(&self, path: &Path) -> Result<(), GeneSetError> {
    tokio::fs::write(path, self.to_tsv()).await?;
    debug!(path = %path.display(), genes = self.len(), "gene set written");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_tsv_sorted_and_unique() {
    let data = json!({
      "up": { "feature_ids": ["GENE_C", "GENE_A"] },
      "down": ["GENE_B", { "id": "GENE_A" }],
    });

    let set = GeneSet::from_object("drought", &data).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(
      set.to_tsv(),
      "drought\tGENE_A\ndrought\tGENE_B\ndrought\tGENE_C\n"
    );
  }

  #[test]
  fn test_empty_set_fails() {
    let err = GeneSet::from_object("nothing", &json!({ "features": [] })).unwrap_err();
    assert!(matches!(err, GeneSetError::EmptySet { ref name } if name == "nothing"));
  }

  #[test]
  fn test_new_deduplicates() {
    let set = GeneSet::new("s", ["b", "a", "b"].map(String::from)).unwrap();
    assert_eq!(set.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(set.name(), "s");
    assert!(!set.is_empty());
  }

  #[tokio::test]
  async fn test_write_tsv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("genes.tsv");

    let set = GeneSet::new("s", ["G2".to_string(), "G1".to_string()]).unwrap();
    set.write_tsv(&path).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "s\tG1\ns\tG2\n");
  }
}
