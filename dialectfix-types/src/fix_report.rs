use serde::{Deserialize, Serialize};

/// One applied edit, as recorded for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFix {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub start: usize,
    pub end: usize,
    pub replacement: String,

    /// Text the edit replaced, sliced from the pre-edit buffer.
    pub original: String,
}

/// Fix-application summary for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFixReport {
    pub file_path: String,
    pub fix_count: usize,

    #[serde(default)]
    pub fixes: Vec<AppliedFix>,
}

impl FileFixReport {
    pub fn new(file_path: impl Into<String>, fixes: Vec<AppliedFix>) -> Self {
        Self {
            file_path: file_path.into(),
            fix_count: fixes.len(),
            fixes,
        }
    }
}
