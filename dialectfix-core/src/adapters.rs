//! Default filesystem-backed and in-memory port implementations.

use crate::overlay::Overlay;
use crate::ports::{CompiledProject, Compiler, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::sync::Mutex;
use tracing::debug;

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<Option<String>> {
        match fs_err::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read {}", path)),
        }
    }

    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs_err::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs_err::write(path, contents).with_context(|| format!("write {}", path))
    }
}

/// In-memory files for embedding and testing.
#[derive(Debug, Default)]
pub struct InMemoryWritePort {
    files: Mutex<BTreeMap<Utf8PathBuf, Vec<u8>>>,
}

impl InMemoryWritePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<Utf8PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), contents.into());
        }
        self
    }

    /// Contents of `path` as text, if present and UTF-8.
    pub fn get(&self, path: &Utf8Path) -> Option<String> {
        let files = self.files.lock().ok()?;
        files
            .get(path)
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }

    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl WritePort for InMemoryWritePort {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<Option<String>> {
        let files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory files poisoned"))?;
        match files.get(path) {
            Some(bytes) => String::from_utf8(bytes.clone())
                .map(Some)
                .with_context(|| format!("{} is not UTF-8", path)),
            None => Ok(None),
        }
    }

    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory files poisoned"))?;
        files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

/// Source texts of a fixed file list, as seen through the overlay.
///
/// For linters that work on plain text rather than a compiler AST.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFiles {
    files: Vec<(Utf8PathBuf, String)>,
}

impl SourceFiles {
    pub fn new(files: Vec<(Utf8PathBuf, String)>) -> Self {
        Self { files }
    }
}

impl CompiledProject for SourceFiles {
    fn files(&self) -> Vec<Utf8PathBuf> {
        self.files.iter().map(|(p, _)| p.clone()).collect()
    }

    fn source(&self, path: &Utf8Path) -> Option<&str> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, t)| t.as_str())
    }
}

/// Reads a fixed file list from disk, overlay first.
#[derive(Debug, Clone)]
pub struct FsSourceCompiler {
    pub files: Vec<Utf8PathBuf>,
}

impl FsSourceCompiler {
    pub fn new(files: Vec<Utf8PathBuf>) -> Self {
        Self { files }
    }
}

impl Compiler for FsSourceCompiler {
    type Project = SourceFiles;

    fn compile(&self, overlay: &Overlay) -> anyhow::Result<SourceFiles> {
        let mut files = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let text = overlay.read(path)?;
            files.push((path.clone(), text));
        }
        debug!(
            files = files.len(),
            overlaid = overlay.len(),
            "loaded sources"
        );
        Ok(SourceFiles::new(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        (temp, root)
    }

    #[test]
    fn fs_write_port_writes_and_creates_dirs() {
        let (_temp, root) = temp_root();
        let target = root.join("nested").join("file.ets");

        let port = FsWritePort;
        assert_eq!(port.read_to_string(&target).expect("read"), None);
        port.write_file(&target, b"hello").expect("write");
        assert_eq!(
            port.read_to_string(&target).expect("read").as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn in_memory_port_round_trips() {
        let port = InMemoryWritePort::new().with_file("a.ets", "old");
        assert_eq!(
            port.read_to_string(Utf8Path::new("a.ets")).expect("read").as_deref(),
            Some("old")
        );
        port.write_file(Utf8Path::new("a.ets~"), b"old").expect("write");
        assert_eq!(
            port.paths(),
            vec![Utf8PathBuf::from("a.ets"), Utf8PathBuf::from("a.ets~")]
        );
        assert_eq!(port.read_to_string(Utf8Path::new("b.ets")).expect("read"), None);
    }

    #[test]
    fn fs_source_compiler_prefers_overlay() {
        let (_temp, root) = temp_root();
        let a = root.join("a.ets");
        let b = root.join("b.ets");
        std::fs::write(&a, "var a;").expect("write");
        std::fs::write(&b, "var b;").expect("write");

        let compiler = FsSourceCompiler::new(vec![a.clone(), b.clone()]);
        let mut overlay = Overlay::new();
        overlay.insert(b.clone(), "let b;".into());

        let project = compiler.compile(&overlay).expect("compile");
        assert_eq!(project.files(), vec![a.clone(), b.clone()]);
        assert_eq!(project.source(&a), Some("var a;"));
        assert_eq!(project.source(&b), Some("let b;"));
        assert_eq!(project.source(Utf8Path::new("c.ets")), None);
    }

    #[test]
    fn fs_source_compiler_fails_on_missing_file() {
        let (_temp, root) = temp_root();
        let compiler = FsSourceCompiler::new(vec![root.join("gone.ets")]);
        assert!(compiler.compile(&Overlay::new()).is_err());
    }
}
