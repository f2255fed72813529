//! Edit engine for dialectfix autofixes.
//!
//! Responsibilities:
//! - Reduce one file's proposed fixes to a conflict-free plan ([`schedule`]).
//! - Rebuild the file text from that plan ([`rewrite`]).
//! - Produce fix-report entries and a unified diff preview.

pub mod error;
pub mod rewrite;
pub mod schedule;

pub use error::{EditError, EditResult};
pub use rewrite::{RewriteOutcome, apply, apply_edits};
pub use schedule::{SchedulePlan, plan_fixes, schedule};

use camino::Utf8Path;
use diffy::PatchFormatter;
use dialectfix_types::{Diagnostic, FileFixReport};
use tracing::debug;

/// Result of fixing one file in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFix {
    pub text: String,
    pub changed: bool,
    pub report: FileFixReport,
    pub plan: SchedulePlan,
    pub anomalies: Vec<EditError>,
}

/// Schedule `diagnostics` (visit order) and apply the accepted edits to `original`.
pub fn fix_file(path: &Utf8Path, original: &str, diagnostics: &[Diagnostic]) -> FileFix {
    let plan = plan_fixes(diagnostics);
    let outcome = apply_edits(original, &plan.edits);
    let changed = outcome.changed(original);

    debug!(
        path = %path,
        accepted = plan.accepted.len(),
        rejected = plan.rejected.len(),
        anomalies = outcome.anomalies.len(),
        changed,
        "fixed file"
    );

    FileFix {
        report: FileFixReport::new(path.as_str(), outcome.applied),
        text: outcome.text,
        changed,
        plan,
        anomalies: outcome.anomalies,
    }
}

/// Unified diff of one file, `git diff` style. Empty when nothing changed.
pub fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let formatter = PatchFormatter::new();
    let patch = diffy::create_patch(before, after);
    let body = formatter.fmt_patch(&patch).to_string();
    // diffy repeats its own ---/+++ header; keep only the hunks.
    let hunks = body
        .split_once("\n@@")
        .map(|(_, rest)| format!("@@{rest}"))
        .unwrap_or(body);
    out.push_str(&hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
