//! Fault classification table.
//!
//! Loaded once per process and shared immutably (typically behind an `Arc`).

use crate::diagnostic::{FaultId, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Attributes of one fault kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultAttrs {
    /// Symbolic name, e.g. `VarDeclaration`.
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub severity: Severity,

    /// Cookbook reference id; `0` means "no cookbook entry".
    #[serde(default)]
    pub cookbook_ref: u32,
}

/// Cookbook text for one reference id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookbookEntry {
    #[serde(default)]
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_title: Option<String>,
}

#[derive(Debug, Error)]
pub enum FaultTableError {
    #[error("invalid fault table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Maps fault ids to their classification and cookbook text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultTable {
    pub faults: BTreeMap<FaultId, FaultAttrs>,
    pub cookbook: BTreeMap<u32, CookbookEntry>,

    /// Rule tags honored in syntax-only interactive mode.
    pub syntax_tags: BTreeSet<u32>,
}

impl FaultTable {
    pub fn from_json(s: &str) -> Result<Self, FaultTableError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_fault(mut self, id: FaultId, attrs: FaultAttrs) -> Self {
        self.faults.insert(id, attrs);
        self
    }

    pub fn with_cookbook(mut self, reference: u32, entry: CookbookEntry) -> Self {
        self.cookbook.insert(reference, entry);
        self
    }

    pub fn get(&self, id: FaultId) -> Option<&FaultAttrs> {
        self.faults.get(&id)
    }

    /// Unknown faults are reported as errors.
    pub fn severity(&self, id: FaultId) -> Severity {
        self.get(id).map(|a| a.severity).unwrap_or(Severity::Error)
    }

    pub fn rule_tag(&self, id: FaultId) -> u32 {
        self.get(id).map(|a| a.cookbook_ref).unwrap_or(0)
    }

    /// Symbolic fault name, falling back to the numeric id.
    pub fn problem_name(&self, id: FaultId) -> String {
        match self.get(id) {
            Some(attrs) if !attrs.name.is_empty() => attrs.name.clone(),
            _ => id.to_string(),
        }
    }

    /// Resolve the message for a record.
    ///
    /// Precedence: non-empty override, cookbook tag, fault description,
    /// then the node-kind label.
    pub fn resolve_message(&self, id: FaultId, node_kind: &str, message_override: Option<&str>) -> String {
        if let Some(msg) = message_override.filter(|m| !m.is_empty()) {
            return msg.to_string();
        }

        let attrs = self.get(id);
        let cookbook_ref = attrs.map(|a| a.cookbook_ref).unwrap_or(0);
        if cookbook_ref > 0
            && let Some(entry) = self.cookbook.get(&cookbook_ref)
            && !entry.tag.is_empty()
        {
            return entry.tag.clone();
        }

        match attrs {
            Some(a) if !a.description.is_empty() => a.description.clone(),
            _ => node_kind.to_string(),
        }
    }

    /// Fix title shown next to an autofix, when the fault has a cookbook entry.
    pub fn fix_title(&self, id: FaultId) -> Option<String> {
        let cookbook_ref = self.rule_tag(id);
        if cookbook_ref == 0 {
            return None;
        }
        self.cookbook.get(&cookbook_ref).and_then(|e| e.fix_title.clone())
    }
}
