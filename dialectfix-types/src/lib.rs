//! Shared DTOs (schemas-as-code) for the dialectfix workspace.
//!
//! # Design constraints
//! - Diagnostics and fix reports are serialized for IDE and audit consumers.
//! - Offsets are 0-based; surfaced lines and columns are 1-based.
//! - Prefer adding optional fields over changing semantics.

pub mod diagnostic;
pub mod fault;
pub mod fix_report;
pub mod stats;
pub mod wire;

pub use diagnostic::{Diagnostic, Edit, FaultId, FileDiagnostics, Location, Severity};
pub use fault::{CookbookEntry, FaultAttrs, FaultTable, FaultTableError};
pub use fix_report::{AppliedFix, FileFixReport};
pub use stats::{FaultStat, FileLine, ProjectStats};

/// Schema identifiers.
pub mod schema {
    pub const DIALECTFIX_DIAGNOSTICS_V1: &str = "dialectfix.diagnostics.v1";
}
