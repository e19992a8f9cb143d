//! GRIN Runtime
//!
//! This crate runs the GRIN tool on behalf of the host platform. It resolves
//! inputs, builds the command, executes it and packages the outputs into a
//! host report.
//!
//! [`GrinAdapter`] ties the stages together. Each stage is also usable on its
//! own: [`InputResolver`], [`build_command`], [`Executor`] and
//! [`ReportPackager`].

mod adapter;
mod command;
mod error;
mod executor;
mod html;
mod packager;
mod resolver;
mod status;

pub use adapter::{GrinAdapter, LOG_FILE};
pub use command::{GrinCommand, ResolvedInputs, build_command, format_decimal, prepare_output_dir};
pub use error::AdapterError;
pub use executor::Executor;
pub use html::write_summary;
pub use packager::{ReportPackager, ReportResult};
pub use resolver::InputResolver;
pub use status::{Status, status};
