#![no_main]

//! Fuzz target for scheduling and rewriting arbitrary fixes.
//!
//! Offsets are unconstrained, so out-of-range, inverted and mid-character
//! edits reach the rewriter; it must drop them instead of panicking.

use arbitrary::Arbitrary;
use camino::Utf8Path;
use dialectfix_types::{Diagnostic, Edit, FaultId, Location, Severity};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    fixes: Vec<Vec<(u16, u16, String)>>,
}

fuzz_target!(|input: Input| {
    let diagnostics: Vec<Diagnostic> = input
        .fixes
        .into_iter()
        .map(|fix| Diagnostic {
            fault_id: FaultId(1),
            severity: Severity::Error,
            start: 0,
            end: 0,
            location: Location::default(),
            rule: String::new(),
            problem: String::new(),
            node_kind: String::new(),
            rule_tag: 0,
            fix: Some(
                fix.into_iter()
                    .map(|(s, e, r)| Edit::new(usize::from(s), usize::from(e), r))
                    .collect(),
            ),
            fix_title: None,
        })
        .collect();

    let plan = dialectfix_edit::plan_fixes(&diagnostics);
    for pair in plan.edits.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }

    let fixed = dialectfix_edit::fix_file(Utf8Path::new("fuzz.ets"), &input.text, &diagnostics);
    let _ = dialectfix_edit::render_patch(Utf8Path::new("fuzz.ets"), &input.text, &fixed.text);
});
