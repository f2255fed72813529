//! Rendering helpers for human-readable artifacts.
//!
//! - The fix report is an HTML page embedding a JSON array of per-file
//!   fix summaries. Later runs append to the embedded array.
//! - The migration summary is markdown.

use dialectfix_types::{FaultTable, FileFixReport, ProjectStats};
use tracing::warn;

const DATA_OPEN: &str = r#"<script type="application/json" id="fix-report">"#;
const DATA_CLOSE: &str = "</script>";

/// Render the fix report page for `reports`.
pub fn render_fix_report_html(reports: &[FileFixReport]) -> String {
    let total: usize = reports.iter().map(|r| r.fix_count).sum();
    let json = serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string());

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>dialectfix fix report</title>\n</head>\n<body>\n");
    out.push_str("<h1>dialectfix fix report</h1>\n");
    out.push_str(&format!(
        "<p>{} file(s), {} fix(es) applied</p>\n",
        reports.len(),
        total
    ));

    if !reports.is_empty() {
        out.push_str("<ul>\n");
        for r in reports {
            out.push_str(&format!(
                "<li><code>{}</code>: {}</li>\n",
                escape_html(&r.file_path),
                r.fix_count
            ));
        }
        out.push_str("</ul>\n");
    }

    out.push_str(DATA_OPEN);
    out.push('\n');
    // "</" would close the script element early.
    out.push_str(&json.replace("</", "<\\/"));
    out.push('\n');
    out.push_str(DATA_CLOSE);
    out.push_str("\n</body>\n</html>\n");
    out
}

/// Extract the embedded fix summaries from a previously written report.
///
/// A page without the data element, or with unparseable JSON, yields an
/// empty list so a damaged report never blocks a new one.
pub fn parse_fix_report_html(html: &str) -> Vec<FileFixReport> {
    let Some(open) = html.find(DATA_OPEN) else {
        warn!("fix report has no embedded data; starting a new one");
        return Vec::new();
    };
    let body = &html[open + DATA_OPEN.len()..];
    let Some(close) = body.find(DATA_CLOSE) else {
        warn!("fix report data is not terminated; starting a new one");
        return Vec::new();
    };

    match serde_json::from_str::<Vec<FileFixReport>>(body[..close].trim()) {
        Ok(reports) => reports,
        Err(err) => {
            warn!(error = %err, "fix report data is malformed; starting a new one");
            Vec::new()
        }
    }
}

/// Prior entries from `existing` (if any) followed by `new`, as a page.
pub fn append_fix_report(existing: Option<&str>, new: &[FileFixReport]) -> String {
    let mut reports = existing.map(parse_fix_report_html).unwrap_or_default();
    reports.extend(new.iter().cloned());
    render_fix_report_html(&reports)
}

/// Markdown summary of a lint or migration run.
///
/// `passes` is `None` for summaries of a diagnostics receipt.
pub fn render_summary_md(
    stats: &ProjectStats,
    table: &FaultTable,
    passes: Option<u32>,
    reports: &[FileFixReport],
) -> String {
    let mut out = String::new();
    out.push_str("# dialectfix summary\n\n");
    if let Some(passes) = passes {
        out.push_str(&format!("- Passes: {}\n", passes));
    }
    out.push_str(&format!("- Problems: {}\n", stats.total()));
    out.push_str(&format!(
        "- Lines with errors: {}\n- Lines with warnings: {}\n",
        stats.error_lines, stats.warning_lines
    ));
    if stats.visited_nodes > 0 {
        out.push_str(&format!("- Nodes visited: {}\n", stats.visited_nodes));
    }
    out.push_str(&format!(
        "- Files fixed: {} ({} fixes)\n\n",
        reports.iter().filter(|r| r.fix_count > 0).count(),
        reports.iter().map(|r| r.fix_count).sum::<usize>()
    ));

    out.push_str("## Faults\n\n");
    if stats.faults.is_empty() {
        out.push_str("_No problems found._\n");
        return out;
    }

    out.push_str("| Fault | Name | Count | Lines |\n|---|---|---|---|\n");
    for (id, stat) in &stats.faults {
        let lines = stat
            .lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            id,
            table.problem_name(*id),
            stat.count,
            lines
        ));
    }

    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
