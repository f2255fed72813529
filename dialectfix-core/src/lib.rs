//! Embeddable core library for dialectfix.
//!
//! Drives lint passes and the multi-pass migration loop over a project
//! without touching clap or the filesystem directly.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`Compiler`](ports::Compiler): build a project view, honouring the overlay
//! - [`Linter`](ports::Linter): run rule code over one file
//! - [`WritePort`](ports::WritePort): read and write result files
//!
//! The [`adapters`] module provides filesystem-backed and in-memory
//! implementations.
//!
//! # Entry points
//!
//! - [`run_lint`](driver::run_lint): one lint pass, no fixing
//! - [`run_migration`](driver::run_migration): lint, fix and recompile until stable

pub mod adapters;
pub mod driver;
pub mod error;
pub mod overlay;
pub mod ports;
pub mod settings;

pub use driver::{EditAnomaly, FileChange, LintOutcome, MigrationOutcome, run_lint, run_migration};
pub use error::CoreError;
pub use overlay::Overlay;
pub use settings::MigrationSettings;

// Re-exported so embedders only need this crate.
pub use dialectfix_collect::{AutofixSink, CancellationToken, Cancelled, Collector, HighlightPolicy};
