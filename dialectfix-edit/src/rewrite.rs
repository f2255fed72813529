//! Buffer reconstruction from a scheduled edit plan.

use crate::error::{EditError, EditResult};
use dialectfix_collect::LineIndex;
use dialectfix_types::{AppliedFix, Edit};
use tracing::error;

/// Rewritten text plus what happened to each edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,

    /// One entry per applied edit, in buffer order.
    pub applied: Vec<AppliedFix>,

    /// Edits that were dropped.
    pub anomalies: Vec<EditError>,
}

impl RewriteOutcome {
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Apply `edits` (ascending, non-overlapping) to `original`.
pub fn apply(original: &str, edits: &[Edit]) -> String {
    apply_edits(original, edits).text
}

/// Cursor walk over `edits`: copy the untouched slice before each edit,
/// append its replacement, skip its range, then copy the tail.
///
/// An edit that starts before the cursor, ends before it starts, leaves the
/// buffer or splits a character is dropped and reported as an anomaly;
/// the remaining edits are still applied.
pub fn apply_edits(original: &str, edits: &[Edit]) -> RewriteOutcome {
    let index = LineIndex::new(original);
    let mut text = String::with_capacity(original.len());
    let mut applied = Vec::with_capacity(edits.len());
    let mut anomalies = Vec::new();
    let mut cursor = 0usize;

    for edit in edits {
        if let Err(err) = check_edit(original, edit, cursor) {
            error!(error = %err, "dropping inconsistent edit");
            anomalies.push(err);
            continue;
        }

        text.push_str(&original[cursor..edit.start]);
        text.push_str(&edit.replacement);

        let (line, column) = index.line_col(original, edit.start).one_based();
        let (end_line, end_column) = index.line_col(original, edit.end).one_based();
        applied.push(AppliedFix {
            line,
            column,
            end_line,
            end_column,
            start: edit.start,
            end: edit.end,
            replacement: edit.replacement.clone(),
            original: original[edit.start..edit.end].to_string(),
        });

        cursor = edit.end;
    }

    text.push_str(&original[cursor..]);

    RewriteOutcome {
        text,
        applied,
        anomalies,
    }
}

fn check_edit(original: &str, edit: &Edit, cursor: usize) -> EditResult<()> {
    let (start, end) = (edit.start, edit.end);
    if start > end {
        return Err(EditError::Inverted { start, end });
    }
    if start < cursor {
        return Err(EditError::OutOfOrder { start, end, cursor });
    }
    if end > original.len() {
        return Err(EditError::OutOfBounds {
            start,
            end,
            len: original.len(),
        });
    }
    if !original.is_char_boundary(start) || !original.is_char_boundary(end) {
        return Err(EditError::NotCharBoundary { start, end });
    }
    Ok(())
}
