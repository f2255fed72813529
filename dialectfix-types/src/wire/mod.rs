use serde::{Deserialize, Serialize};

pub mod diagnostics_v1;

pub use diagnostics_v1::{DiagnosticsV1, EditV1, FileProblemsV1, ProblemInfoV1};

/// Producer of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfoV1 {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl ToolInfoV1 {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            commit: None,
        }
    }

    /// This crate, as built.
    pub fn dialectfix() -> Self {
        Self::new("dialectfix", env!("CARGO_PKG_VERSION"))
    }
}
