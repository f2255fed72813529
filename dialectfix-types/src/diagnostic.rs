use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of one compatibility rule violation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaultId(pub u32);

impl FaultId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for FaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a fault.
///
/// Serialized as its ordinal (`1` warning, `2` error) to match the export
/// schema consumed by IDE tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    Warning,
    #[default]
    Error,
}

impl Severity {
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        match s {
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, String> {
        match v {
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Error),
            other => Err(format!("unknown severity ordinal {other}")),
        }
    }
}

/// 1-based line/column quadruple surfaced to consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

/// One textual replacement `[start, end) -> replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,

    /// Filled in by the collector; rule code only supplies offsets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Edit {
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
            location: None,
        }
    }

    /// Pure insertion at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, offset, text)
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Two ranges overlap unless one ends at or before the other begins.
    /// Ranges that merely touch (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Edit) -> bool {
        ranges_overlap(self.start, self.end, other.start, other.end)
    }
}

pub(crate) fn ranges_overlap(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    !(a_end <= b_start || b_end <= a_start)
}

/// One located problem plus its candidate fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub fault_id: FaultId,
    pub severity: Severity,
    pub start: usize,
    pub end: usize,
    pub location: Location,

    /// Resolved human-readable message.
    pub rule: String,

    /// Symbolic fault name.
    pub problem: String,

    /// Label of the AST node kind the fault was reported on.
    pub node_kind: String,

    /// Cookbook reference id, `0` when the fault has none.
    #[serde(default)]
    pub rule_tag: u32,

    /// Edits applied together or not at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Vec<Edit>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_title: Option<String>,
}

impl Diagnostic {
    pub fn is_autofixable(&self) -> bool {
        self.fix.as_ref().is_some_and(|edits| !edits.is_empty())
    }
}

/// Diagnostics of one file, in AST-visit order.
///
/// The order is significant: it is the priority used when fixes conflict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiagnostics {
    pub path: Utf8PathBuf,

    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl FileDiagnostics {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_autofixable()).count()
    }

    pub fn has_fixable(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_autofixable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edits_do_not_overlap() {
        let a = Edit::new(0, 3, "let");
        let b = Edit::new(3, 5, "");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn nested_and_crossing_edits_overlap() {
        let outer = Edit::new(5, 10, "x");
        assert!(outer.overlaps(&Edit::new(8, 12, "y")));
        assert!(outer.overlaps(&Edit::new(6, 7, "y")));
        assert!(Edit::new(6, 7, "y").overlaps(&outer));
    }

    #[test]
    fn insertion_inside_range_overlaps() {
        let outer = Edit::new(5, 10, "x");
        assert!(outer.overlaps(&Edit::insert(7, "y")));
        assert!(!outer.overlaps(&Edit::insert(10, "y")));
    }

    #[test]
    fn severity_round_trips_through_ordinal() {
        assert_eq!(u8::from(Severity::Warning), 1);
        assert_eq!(Severity::try_from(2u8), Ok(Severity::Error));
        assert!(Severity::try_from(7u8).is_err());
    }

    #[test]
    fn empty_fix_is_not_autofixable() {
        let d = Diagnostic {
            fault_id: FaultId(1),
            severity: Severity::Error,
            start: 0,
            end: 1,
            location: Location::default(),
            rule: String::new(),
            problem: String::new(),
            node_kind: String::new(),
            rule_tag: 0,
            fix: Some(vec![]),
            fix_title: None,
        };
        assert!(!d.is_autofixable());
    }
}
