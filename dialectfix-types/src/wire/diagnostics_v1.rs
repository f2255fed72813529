use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Edit, FaultId, FileDiagnostics, Location, Severity};
use crate::wire::ToolInfoV1;

/// Schema-exact export of one edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditV1 {
    pub start: usize,
    pub end: usize,
    pub replacement_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl From<&Edit> for EditV1 {
    fn from(e: &Edit) -> Self {
        Self {
            start: e.start,
            end: e.end,
            replacement_text: e.replacement.clone(),
            line: e.location.map(|l| l.line),
            column: e.location.map(|l| l.column),
            end_line: e.location.map(|l| l.end_line),
            end_column: e.location.map(|l| l.end_column),
        }
    }
}

impl From<EditV1> for Edit {
    fn from(e: EditV1) -> Self {
        let location = match (e.line, e.column, e.end_line, e.end_column) {
            (Some(line), Some(column), Some(end_line), Some(end_column)) => Some(Location {
                line,
                column,
                end_line,
                end_column,
            }),
            _ => None,
        };
        Self {
            start: e.start,
            end: e.end,
            replacement: e.replacement_text,
            location,
        }
    }
}

/// Schema-exact export of one diagnostic record, as consumed by IDE tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemInfoV1 {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub start: usize,
    pub end: usize,

    /// Node kind label.
    #[serde(rename = "type")]
    pub kind: String,

    pub severity: Severity,
    pub fault_id: u32,
    pub problem: String,
    pub rule: String,

    #[serde(default)]
    pub rule_tag: u32,

    #[serde(default)]
    pub autofixable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autofix: Option<Vec<EditV1>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autofix_title: Option<String>,
}

impl From<&Diagnostic> for ProblemInfoV1 {
    fn from(d: &Diagnostic) -> Self {
        Self {
            line: d.location.line,
            column: d.location.column,
            end_line: d.location.end_line,
            end_column: d.location.end_column,
            start: d.start,
            end: d.end,
            kind: d.node_kind.clone(),
            severity: d.severity,
            fault_id: d.fault_id.0,
            problem: d.problem.clone(),
            rule: d.rule.clone(),
            rule_tag: d.rule_tag,
            autofixable: d.is_autofixable(),
            autofix: d.fix.as_ref().map(|edits| edits.iter().map(EditV1::from).collect()),
            autofix_title: d.fix_title.clone(),
        }
    }
}

impl From<ProblemInfoV1> for Diagnostic {
    fn from(p: ProblemInfoV1) -> Self {
        Self {
            fault_id: FaultId(p.fault_id),
            severity: p.severity,
            start: p.start,
            end: p.end,
            location: Location {
                line: p.line,
                column: p.column,
                end_line: p.end_line,
                end_column: p.end_column,
            },
            rule: p.rule,
            problem: p.problem,
            node_kind: p.kind,
            rule_tag: p.rule_tag,
            fix: p.autofix.map(|edits| edits.into_iter().map(Edit::from).collect()),
            fix_title: p.autofix_title,
        }
    }
}

/// Problems of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProblemsV1 {
    pub file_path: String,

    #[serde(default)]
    pub problems: Vec<ProblemInfoV1>,
}

impl From<&FileDiagnostics> for FileProblemsV1 {
    fn from(f: &FileDiagnostics) -> Self {
        Self {
            file_path: f.path.to_string(),
            problems: f.diagnostics.iter().map(ProblemInfoV1::from).collect(),
        }
    }
}

impl From<FileProblemsV1> for FileDiagnostics {
    fn from(f: FileProblemsV1) -> Self {
        Self {
            path: f.file_path.into(),
            diagnostics: f.problems.into_iter().map(Diagnostic::from).collect(),
        }
    }
}

/// Schema-exact receipt of a lint run: every file's problems in visit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsV1 {
    pub schema: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolInfoV1>,

    #[serde(default)]
    pub files: Vec<FileProblemsV1>,
}

impl DiagnosticsV1 {
    pub fn new(files: &[FileDiagnostics]) -> Self {
        Self {
            schema: crate::schema::DIALECTFIX_DIAGNOSTICS_V1.to_string(),
            tool: Some(ToolInfoV1::dialectfix()),
            files: files.iter().map(FileProblemsV1::from).collect(),
        }
    }

    /// Credit a different producer, e.g. the linter that exported the records.
    pub fn with_tool(mut self, tool: ToolInfoV1) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn into_file_diagnostics(self) -> Vec<FileDiagnostics> {
        self.files.into_iter().map(FileDiagnostics::from).collect()
    }
}
