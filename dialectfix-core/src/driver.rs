//! Lint and migration entry points.
//!
//! A migration is a bounded fixed-point loop:
//! `Linting -> Fixing -> Recompiling -> (Linting | Done)`.
//! Fixed texts accumulate in an [`Overlay`] that the compiler reads before
//! disk; nothing is written until the loop ends.

use crate::error::CoreError;
use crate::overlay::Overlay;
use crate::ports::{CompiledProject, Compiler, Linter, WritePort};
use crate::settings::MigrationSettings;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use dialectfix_collect::{AutofixSink, CancellationToken, Collector};
use dialectfix_edit::{EditError, fix_file};
use dialectfix_render::append_fix_report;
use dialectfix_types::{FaultTable, FileDiagnostics, FileFixReport, ProjectStats};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Outcome of [`run_lint`].
#[derive(Debug, Clone, Default)]
pub struct LintOutcome {
    pub diagnostics: Vec<FileDiagnostics>,
    pub stats: ProjectStats,
    pub cancelled: bool,
}

impl LintOutcome {
    fn fixable_files(&self) -> impl Iterator<Item = &FileDiagnostics> {
        self.diagnostics.iter().filter(|f| f.has_fixable())
    }
}

/// A file written when the migration finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: Utf8PathBuf,
    pub sha256_before: Option<String>,
    pub sha256_after: String,
    pub backup_path: Option<Utf8PathBuf>,
}

/// An edit dropped by the rewriter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditAnomaly {
    pub path: Utf8PathBuf,
    pub pass: u32,
    pub error: EditError,
}

/// Outcome of [`run_migration`].
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    /// Fixing steps run.
    pub passes: u32,

    /// Post-migration diagnostics, or the pre-migration ones in IDE mode.
    pub diagnostics: Vec<FileDiagnostics>,
    pub stats: ProjectStats,

    /// One entry per file and pass that changed.
    pub fix_reports: Vec<FileFixReport>,
    pub files_written: Vec<FileChange>,
    pub anomalies: Vec<EditAnomaly>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl MigrationOutcome {
    pub fn fix_count(&self) -> usize {
        self.fix_reports.iter().map(|r| r.fix_count).sum()
    }
}

/// Compile the project as it is on disk and lint every file once.
pub fn run_lint<C: Compiler>(
    compiler: &C,
    linter: &dyn Linter<C::Project>,
    table: &FaultTable,
    settings: &MigrationSettings,
    cancel: &CancellationToken,
) -> Result<LintOutcome, CoreError> {
    let project = compiler
        .compile(&Overlay::new())
        .map_err(CoreError::Compile)?;
    Ok(lint_project(&project, linter, table, settings, cancel))
}

/// Lint, fix and recompile until no fix applies or the pass budget is spent,
/// then write every rewritten file through `writer`.
///
/// Only a failure of the initial compile aborts with nothing written. A
/// recompile failure ends the loop, the fixes made so far are written and
/// reported, and the failure is returned as [`CoreError::Compile`].
pub fn run_migration<C: Compiler>(
    compiler: &C,
    linter: &dyn Linter<C::Project>,
    table: &FaultTable,
    settings: &MigrationSettings,
    writer: &dyn WritePort,
    cancel: &CancellationToken,
) -> Result<MigrationOutcome, CoreError> {
    let started_at = Utc::now();
    let mut overlay = Overlay::new();

    let mut project = compiler.compile(&overlay).map_err(CoreError::Compile)?;
    let originals = snapshot(&project);
    let initial = lint_project(&project, linter, table, settings, cancel);
    let mut cancelled = initial.cancelled;
    let mut current = initial.clone();

    let mut passes = 0u32;
    let mut fix_reports = Vec::new();
    let mut anomalies = Vec::new();
    let mut recompile_error = None;

    while !cancelled && passes < settings.migration_max_pass {
        passes += 1;

        // Fixing
        let mut progress = false;
        for file in current.fixable_files() {
            let Some(text) = project.source(&file.path) else {
                warn!(path = %file.path, pass = passes, "file no longer in project, skipping");
                continue;
            };
            let fix = fix_file(&file.path, text, &file.diagnostics);
            anomalies.extend(fix.anomalies.into_iter().map(|error| EditAnomaly {
                path: file.path.clone(),
                pass: passes,
                error,
            }));
            if fix.changed {
                progress = true;
                overlay.insert(file.path.clone(), fix.text);
                fix_reports.push(fix.report);
            }
        }
        if let Some(header) = settings.required_header.as_deref() {
            insert_header(&project, &mut overlay, header);
        }

        debug!(pass = passes, progress, overlaid = overlay.len(), "fix pass done");
        if !progress {
            break;
        }

        // Recompiling
        project = match compiler.compile(&overlay) {
            Ok(project) => project,
            Err(err) => {
                let msg = format!("{err:#}");
                error!(
                    pass = passes,
                    error = %msg,
                    "recompile failed; writing fixes made so far"
                );
                recompile_error = Some(err);
                break;
            }
        };
        let next = lint_project(&project, linter, table, settings, cancel);
        if next.cancelled {
            cancelled = true;
            break;
        }
        current = next;
    }

    if cancelled {
        info!(passes, "migration cancelled; writing fixes made so far");
    }

    let files_written = write_overlay(&overlay, &originals, settings, writer)?;

    if settings.migration_report && !fix_reports.is_empty() {
        write_fix_report(&fix_reports, settings, writer)?;
    }

    if let Some(err) = recompile_error {
        return Err(CoreError::Compile(err));
    }

    let result = if settings.ide_interactive { initial } else { current };

    info!(
        passes,
        files = files_written.len(),
        fixes = fix_reports.iter().map(|r| r.fix_count).sum::<usize>(),
        "migration finished"
    );

    Ok(MigrationOutcome {
        passes,
        diagnostics: result.diagnostics,
        stats: result.stats,
        fix_reports,
        files_written,
        anomalies,
        cancelled,
        started_at,
        ended_at: Utc::now(),
    })
}

fn lint_project<P: CompiledProject>(
    project: &P,
    linter: &dyn Linter<P>,
    table: &FaultTable,
    settings: &MigrationSettings,
    cancel: &CancellationToken,
) -> LintOutcome {
    let options = settings.collect_options();
    let sink = settings
        .autofix_sink
        .as_deref()
        .map(|s| s as &dyn AutofixSink);

    let mut outcome = LintOutcome::default();
    for path in project.files() {
        let Some(text) = project.source(&path) else {
            warn!(path = %path, "no source for file, skipping");
            continue;
        };

        let mut collector = Collector::new(path.clone(), text, table, &options).with_sink(sink);
        if let Some(highlight) = settings.highlight.as_deref() {
            collector = collector.with_highlight(highlight);
        }

        if linter
            .lint_file(project, &path, &mut collector, cancel)
            .is_err()
        {
            debug!(path = %path, "lint cancelled");
            outcome.cancelled = true;
            break;
        }

        let (file, stats) = collector.finish();
        outcome.stats.merge(&stats);
        outcome.diagnostics.push(file);
    }
    outcome
}

/// Prefix `header` to every file that lacks it and has no pending text.
///
/// Files already rewritten by a fix keep their fixed text as is.
fn insert_header<P: CompiledProject>(project: &P, overlay: &mut Overlay, header: &str) {
    for path in project.files() {
        if overlay.contains(&path) {
            continue;
        }
        let Some(current) = project.source(&path) else {
            continue;
        };
        if current.starts_with(header) {
            continue;
        }
        debug!(path = %path, "inserting header directive");
        overlay.insert(path, format!("{header}{current}"));
    }
}

fn snapshot<P: CompiledProject>(project: &P) -> BTreeMap<Utf8PathBuf, String> {
    project
        .files()
        .into_iter()
        .filter_map(|path| {
            let text = project.source(&path)?.to_string();
            Some((path, text))
        })
        .collect()
}

fn write_overlay(
    overlay: &Overlay,
    originals: &BTreeMap<Utf8PathBuf, String>,
    settings: &MigrationSettings,
    writer: &dyn WritePort,
) -> Result<Vec<FileChange>, CoreError> {
    let mut written = Vec::new();
    let mut first_error = None;

    for (path, text) in overlay.iter() {
        let original = originals.get(path);
        if original.is_some_and(|o| o == text) {
            continue;
        }

        match write_one(path, text, original.map(String::as_str), settings, writer) {
            Ok(change) => written.push(change),
            Err(err) => {
                let msg = format!("{err:#}");
                error!(path = %path, error = %msg, "failed to write migrated file");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(CoreError::Write(err)),
        None => Ok(written),
    }
}

fn write_one(
    path: &Utf8Path,
    text: &str,
    original: Option<&str>,
    settings: &MigrationSettings,
    writer: &dyn WritePort,
) -> anyhow::Result<FileChange> {
    let mut backup_path = None;
    if !settings.no_migration_backup_file
        && let Some(original) = original
    {
        let backup = backup_path_for(path);
        writer
            .write_file(&backup, original.as_bytes())
            .with_context(|| format!("back up {}", path))?;
        backup_path = Some(backup);
    }

    writer.write_file(path, text.as_bytes())?;
    debug!(path = %path, "wrote migrated file");

    Ok(FileChange {
        path: path.to_path_buf(),
        sha256_before: original.map(|o| sha256_hex(o.as_bytes())),
        sha256_after: sha256_hex(text.as_bytes()),
        backup_path,
    })
}

fn write_fix_report(
    reports: &[FileFixReport],
    settings: &MigrationSettings,
    writer: &dyn WritePort,
) -> Result<(), CoreError> {
    let path = &settings.report_path;
    let existing = writer.read_to_string(path).map_err(CoreError::Report)?;
    let html = append_fix_report(existing.as_deref(), reports);
    writer
        .write_file(path, html.as_bytes())
        .with_context(|| format!("write fix report {}", path))
        .map_err(CoreError::Report)
}

/// `<path>~`
pub fn backup_path_for(path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}~", path))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_path_appends_tilde() {
        assert_eq!(
            backup_path_for(Utf8Path::new("src/a.ets")),
            Utf8PathBuf::from("src/a.ets~")
        );
    }

    #[test]
    fn sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
