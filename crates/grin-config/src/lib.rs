//! GRIN Config
//!
//! This crate contains the configuration types for the GRIN adapter.
//!
//! There are two layers:
//! - [`RunParams`] is the loosely-typed record a caller submits for one run
//!   (JSON from the host or the CLI). [`RunConfig::from_params`] validates it
//!   into an immutable [`RunConfig`].
//! - [`AdapterConfig`] is injected once when the adapter is constructed. It
//!   holds the scratch root, the external tool launcher and the attachment
//!   allow-list, so nothing about the tool installation is hard-coded.

mod adapter;
mod coerce;
mod error;
mod params;

pub use adapter::{AdapterConfig, ToolConfig};
pub use coerce::{is_truthy, sanitize_label};
pub use error::ConfigError;
pub use params::{InputSelector, RunConfig, RunParams};
