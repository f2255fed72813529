#![no_main]

//! Fuzz target for receipt, fault table and fix report parsing.
//!
//! Malformed input must be rejected (or, for the fix report, treated as
//! empty) without panicking.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(receipt) = serde_json::from_str::<dialectfix_types::wire::DiagnosticsV1>(s) {
        let _ = receipt.into_file_diagnostics();
    }
    let _ = serde_json::from_str::<dialectfix_types::wire::ProblemInfoV1>(s);
    let _ = dialectfix_types::FaultTable::from_json(s);

    let reports = dialectfix_render::parse_fix_report_html(s);
    let _ = dialectfix_render::append_fix_report(Some(s), &reports);
});
