//! Conflict resolution for the fixes of one file.
//!
//! Greedy in discovery order: a record's fix is accepted unless it overlaps
//! an already accepted edit, in which case all of its edits are rejected.
//! Earlier records always win, whatever the size of later ranges.

use dialectfix_types::{Diagnostic, Edit};
use tracing::debug;

/// Outcome of scheduling one file's fixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePlan {
    /// Accepted edits, sorted by `(start, end)`, pairwise non-overlapping.
    pub edits: Vec<Edit>,

    /// Indices (into the input slice) of records whose fix was accepted.
    pub accepted: Vec<usize>,

    /// Indices of records whose fix conflicted with an earlier one.
    pub rejected: Vec<usize>,
}

impl SchedulePlan {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Accepted, non-overlapping edits for `diagnostics`, in buffer order.
pub fn schedule(diagnostics: &[Diagnostic]) -> Vec<Edit> {
    plan_fixes(diagnostics).edits
}

pub fn plan_fixes(diagnostics: &[Diagnostic]) -> SchedulePlan {
    let mut plan = SchedulePlan::default();

    for (idx, diagnostic) in diagnostics.iter().enumerate() {
        let Some(fix) = diagnostic.fix.as_ref().filter(|f| !f.is_empty()) else {
            continue;
        };

        let mut candidate = fix.clone();
        candidate.sort_by_key(|e| (e.start, e.end));

        let lo = candidate.iter().map(|e| e.start).min().unwrap_or(0);
        let hi = candidate.iter().map(|e| e.end).max().unwrap_or(lo);

        if conflicts(&plan.edits, lo, hi) {
            debug!(
                fault = %diagnostic.fault_id,
                lo,
                hi,
                "fix rejected: overlaps an earlier fix"
            );
            plan.rejected.push(idx);
            continue;
        }

        for edit in candidate {
            insert_sorted(&mut plan.edits, edit);
        }
        plan.accepted.push(idx);
    }

    plan
}

/// True if any accepted edit overlaps `[lo, hi]`.
///
/// Touching ranges do not conflict. `accepted` is sorted by start, so the
/// scan stops at the first edit starting past `hi`.
fn conflicts(accepted: &[Edit], lo: usize, hi: usize) -> bool {
    for edit in accepted {
        if edit.start > hi {
            break;
        }
        if edit.end > lo && hi > edit.start {
            return true;
        }
    }
    false
}

/// Insert after every edit with the same or smaller `(start, end)`, so
/// insertions at an offset precede a replacement starting there and equal
/// keys keep acceptance order.
fn insert_sorted(edits: &mut Vec<Edit>, edit: Edit) {
    let key = (edit.start, edit.end);
    let pos = edits.partition_point(|e| (e.start, e.end) <= key);
    edits.insert(pos, edit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectfix_types::{FaultId, Location, Severity};
    use pretty_assertions::assert_eq;

    fn diag(fault: u32, fix: Option<Vec<Edit>>) -> Diagnostic {
        Diagnostic {
            fault_id: FaultId(fault),
            severity: Severity::Error,
            start: 0,
            end: 0,
            location: Location::default(),
            rule: String::new(),
            problem: String::new(),
            node_kind: String::new(),
            rule_tag: 0,
            fix,
            fix_title: None,
        }
    }

    fn ranges(edits: &[Edit]) -> Vec<(usize, usize)> {
        edits.iter().map(|e| (e.start, e.end)).collect()
    }

    #[test]
    fn earlier_record_wins_on_overlap() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(5, 10, "a")])),
            diag(2, Some(vec![Edit::new(8, 12, "b")])),
        ];
        let plan = plan_fixes(&ds);
        assert_eq!(ranges(&plan.edits), vec![(5, 10)]);
        assert_eq!(plan.accepted, vec![0]);
        assert_eq!(plan.rejected, vec![1]);
    }

    #[test]
    fn smaller_later_fix_does_not_preempt_larger_earlier_fix() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(0, 100, "big")])),
            diag(2, Some(vec![Edit::new(40, 41, "x")])),
        ];
        assert_eq!(ranges(&schedule(&ds)), vec![(0, 100)]);
    }

    #[test]
    fn touching_ranges_are_both_accepted() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(3, 6, "a")])),
            diag(2, Some(vec![Edit::new(0, 3, "b")])),
            diag(3, Some(vec![Edit::new(6, 9, "c")])),
        ];
        assert_eq!(ranges(&schedule(&ds)), vec![(0, 3), (3, 6), (6, 9)]);
    }

    #[test]
    fn multi_edit_fix_is_all_or_nothing() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(20, 25, "a")])),
            // Second location of this rename collides with the first fix.
            diag(2, Some(vec![Edit::new(22, 24, "b"), Edit::new(0, 4, "b")])),
        ];
        let plan = plan_fixes(&ds);
        assert_eq!(ranges(&plan.edits), vec![(20, 25)]);
        assert_eq!(plan.rejected, vec![1]);
    }

    #[test]
    fn multi_edit_fix_is_checked_by_its_whole_span() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(10, 12, "b")])),
            diag(2, Some(vec![Edit::new(30, 33, "a"), Edit::new(0, 3, "a")])),
        ];
        let plan = plan_fixes(&ds);
        assert_eq!(ranges(&plan.edits), vec![(10, 12)]);
        assert_eq!(plan.rejected, vec![1]);
    }

    #[test]
    fn multi_edit_fix_is_merged_in_order() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(30, 33, "a"), Edit::new(0, 3, "a")])),
            diag(2, Some(vec![Edit::new(40, 42, "b")])),
        ];
        assert_eq!(ranges(&schedule(&ds)), vec![(0, 3), (30, 33), (40, 42)]);
    }

    #[test]
    fn records_without_fix_are_skipped() {
        let ds = vec![diag(1, None), diag(2, Some(vec![])), diag(3, Some(vec![Edit::new(1, 2, "")]))];
        let plan = plan_fixes(&ds);
        assert_eq!(plan.accepted, vec![2]);
        assert!(plan.rejected.is_empty());
    }

    #[test]
    fn insertion_at_start_of_replacement_sorts_first() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(5, 10, "r")])),
            diag(2, Some(vec![Edit::insert(5, "i")])),
        ];
        let edits = schedule(&ds);
        assert_eq!(ranges(&edits), vec![(5, 5), (5, 10)]);
        assert_eq!(edits[0].replacement, "i");
    }

    #[test]
    fn insertion_inside_accepted_range_is_rejected() {
        let ds = vec![
            diag(1, Some(vec![Edit::new(5, 10, "r")])),
            diag(2, Some(vec![Edit::insert(7, "i")])),
        ];
        assert_eq!(ranges(&schedule(&ds)), vec![(5, 10)]);
    }

    #[test]
    fn no_fixes_yields_empty_plan() {
        assert!(plan_fixes(&[diag(1, None)]).is_empty());
        assert!(schedule(&[]).is_empty());
    }
}
