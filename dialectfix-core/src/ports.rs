//! Port traits abstracting the compiler and all I/O away from the driver.

use crate::overlay::Overlay;
use camino::{Utf8Path, Utf8PathBuf};
use dialectfix_collect::{CancellationToken, Cancelled, Collector};

/// A compiled view of the project for one pass.
pub trait CompiledProject {
    /// Source files in lint order.
    fn files(&self) -> Vec<Utf8PathBuf>;

    /// Text the project was compiled from, `None` if the file is not part of it.
    fn source(&self, path: &Utf8Path) -> Option<&str>;
}

/// Builds a [`CompiledProject`]; overlay entries take precedence over disk.
pub trait Compiler {
    type Project: CompiledProject;

    fn compile(&self, overlay: &Overlay) -> anyhow::Result<Self::Project>;
}

/// Rule code for one file of a compiled project.
///
/// Implementations visit the file's AST and call [`Collector::record`];
/// they should stop with [`Cancelled`] once `cancel` fires.
pub trait Linter<P: CompiledProject> {
    fn lint_file(
        &self,
        project: &P,
        path: &Utf8Path,
        collector: &mut Collector<'_>,
        cancel: &CancellationToken,
    ) -> Result<(), Cancelled>;
}

/// File-system read/write operations for migration results.
pub trait WritePort {
    /// `Ok(None)` when the file does not exist.
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<Option<String>>;
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
}
