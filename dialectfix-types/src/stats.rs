use crate::diagnostic::{FaultId, Severity};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A 1-based line of one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileLine {
    pub path: Utf8PathBuf,
    pub line: u32,
}

impl FileLine {
    pub fn new(path: impl Into<Utf8PathBuf>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for FileLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// Occurrences of one fault across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultStat {
    pub count: u64,

    /// Distinct lines the fault was reported on, across files.
    #[serde(default)]
    pub lines: BTreeSet<FileLine>,
}

/// Aggregated counters for a run. Derived only; never feeds back into records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(default)]
    pub faults: BTreeMap<FaultId, FaultStat>,

    /// Incremented once per error-severity record.
    #[serde(default)]
    pub error_lines: u64,

    /// Incremented when a warning lands on a different line than the previous warning.
    #[serde(default)]
    pub warning_lines: u64,

    #[serde(default)]
    pub visited_nodes: u64,

    #[serde(skip)]
    last_warning_line: Option<FileLine>,
}

impl ProjectStats {
    pub fn record(&mut self, fault_id: FaultId, severity: Severity, path: &Utf8Path, line: u32) {
        let at = FileLine::new(path, line);
        match severity {
            Severity::Error => self.error_lines += 1,
            Severity::Warning => {
                if self.last_warning_line.as_ref() != Some(&at) {
                    self.last_warning_line = Some(at.clone());
                    self.warning_lines += 1;
                }
            }
        }

        let stat = self.faults.entry(fault_id).or_default();
        stat.count += 1;
        stat.lines.insert(at);
    }

    pub fn count(&self, fault_id: FaultId) -> u64 {
        self.faults.get(&fault_id).map(|s| s.count).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.faults.values().map(|s| s.count).sum()
    }

    /// Fold `other` into `self`. Line sets are unioned.
    pub fn merge(&mut self, other: &ProjectStats) {
        for (id, stat) in &other.faults {
            let mine = self.faults.entry(*id).or_default();
            mine.count += stat.count;
            mine.lines.extend(stat.lines.iter().cloned());
        }
        self.error_lines += other.error_lines;
        self.warning_lines += other.warning_lines;
        self.visited_nodes += other.visited_nodes;
    }
}
