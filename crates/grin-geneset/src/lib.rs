//! Gene sets for GRIN.
//!
//! GRIN reads its gene set as a two-column TSV (`set_name`, `feature_id`).
//! Gene-set objects in the host object store are loosely typed: the same
//! identifiers may sit under `feature_ids`, inside `features` records, in
//! nested lists, or spread over named groups. [`extract_feature_ids`] walks
//! those shapes and [`GeneSet`] turns the result into the TSV.

mod error;
mod geneset;
mod shape;

pub use error::GeneSetError;
pub use geneset::GeneSet;
pub use shape::{Shape, extract_feature_ids};
