//! Property-based tests for fix scheduling and rewriting.
//!
//! These tests verify key invariants:
//! - Non-overlap: accepted edits never overlap pairwise
//! - Priority: the first record (visit order) always keeps its fix
//! - Preservation: bytes outside the edited ranges survive verbatim, in order
//! - Consistency: a scheduled plan never produces rewrite anomalies

use dialectfix_edit::{apply_edits, plan_fixes, schedule};
use dialectfix_types::{Diagnostic, Edit, FaultId, Location, Severity};
use proptest::prelude::*;

fn diag(fix: Vec<Edit>) -> Diagnostic {
    Diagnostic {
        fault_id: FaultId(1),
        severity: Severity::Error,
        start: 0,
        end: 0,
        location: Location::default(),
        rule: String::new(),
        problem: String::new(),
        node_kind: String::new(),
        rule_tag: 0,
        fix: Some(fix),
        fix_title: None,
    }
}

/// One fix: 1-3 disjoint edits inside `len`, listed in reverse buffer order
/// so the scheduler has to sort them.
fn arb_fix(len: usize) -> impl Strategy<Value = Vec<Edit>> {
    (
        0..=len,
        prop::collection::vec((0usize..12, 0usize..8, "[A-Z]{0,4}"), 1..3),
    )
        .prop_map(move |(first, parts)| {
            let mut edits = Vec::new();
            let mut pos = first;
            for (gap, width, repl) in parts {
                let start = pos + gap * usize::from(!edits.is_empty());
                if start > len {
                    break;
                }
                let end = (start + width).min(len);
                edits.push(Edit::new(start, end, repl));
                pos = end;
            }
            edits.reverse();
            edits
        })
}

/// Text plus diagnostics whose fixes stay inside it.
fn arb_case() -> impl Strategy<Value = (String, Vec<Diagnostic>)> {
    "[a-z ;]{0,60}".prop_flat_map(|text| {
        let len = text.len();
        let fixes = prop::collection::vec(arb_fix(len), 0..8);
        (Just(text), fixes.prop_map(|fs| fs.into_iter().map(diag).collect()))
    })
}

proptest! {
    #[test]
    fn accepted_edits_never_overlap((_text, diags) in arb_case()) {
        let edits = schedule(&diags);
        for (i, a) in edits.iter().enumerate() {
            for b in edits.iter().skip(i + 1) {
                prop_assert!(a.end <= b.start || b.end <= a.start, "{:?} overlaps {:?}", a, b);
            }
        }
        for w in edits.windows(2) {
            prop_assert!(w[0].start <= w[1].start);
        }
    }

    #[test]
    fn first_fix_always_survives((_text, diags) in arb_case()) {
        prop_assume!(!diags.is_empty());
        let plan = plan_fixes(&diags);
        prop_assert_eq!(plan.accepted.first().copied(), Some(0));
        for edit in diags[0].fix.as_ref().unwrap() {
            prop_assert!(plan.edits.contains(edit));
        }
    }

    #[test]
    fn every_fix_is_accepted_or_rejected_whole((_text, diags) in arb_case()) {
        let plan = plan_fixes(&diags);
        prop_assert_eq!(plan.accepted.len() + plan.rejected.len(), diags.len());
        let accepted_edits: usize = plan
            .accepted
            .iter()
            .map(|&i| diags[i].fix.as_ref().unwrap().len())
            .sum();
        prop_assert_eq!(accepted_edits, plan.edits.len());
    }

    #[test]
    fn rewrite_preserves_untouched_text((text, diags) in arb_case()) {
        let edits = schedule(&diags);
        let out = apply_edits(&text, &edits);
        prop_assert!(out.anomalies.is_empty());

        // Rebuild the expected output from the original slices.
        let mut expected = String::new();
        let mut cursor = 0;
        for e in &edits {
            expected.push_str(&text[cursor..e.start]);
            expected.push_str(&e.replacement);
            cursor = e.end;
        }
        expected.push_str(&text[cursor..]);
        prop_assert_eq!(&out.text, &expected);

        // Gaps between edits appear verbatim, in order.
        let mut search_from = 0;
        let mut cursor = 0;
        for e in &edits {
            let gap = &text[cursor..e.start];
            let found = out.text[search_from..].find(gap);
            prop_assert!(found.is_some());
            search_from += found.unwrap() + gap.len();
            cursor = e.end;
        }
    }

    #[test]
    fn no_fixes_means_no_change(text in "[a-z ;\n]{0,60}") {
        let diags: Vec<Diagnostic> = Vec::new();
        let edits = schedule(&diags);
        prop_assert!(edits.is_empty());
        prop_assert_eq!(apply_edits(&text, &edits).text, text);
    }
}
