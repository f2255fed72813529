//! Pending file texts produced by fix passes.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;

/// `path -> new text` for every file a migration has rewritten.
///
/// Owned by the driver for one run; nothing here is written to disk until
/// the loop ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    files: BTreeMap<Utf8PathBuf, String>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Utf8Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }

    /// Replace the pending text of `path`, returning the previous one.
    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, text: String) -> Option<String> {
        self.files.insert(path.into(), text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &str)> {
        self.files.iter().map(|(p, t)| (p.as_path(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Overlay text for `path`, else the file on disk.
    pub fn read(&self, path: &Utf8Path) -> anyhow::Result<String> {
        match self.get(path) {
            Some(text) => Ok(text.to_string()),
            None => fs_err::read_to_string(path).with_context(|| format!("read {}", path)),
        }
    }
}
