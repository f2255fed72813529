//! Receipt-driven fixing: one scheduling + rewrite step per file.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use dialectfix_core::driver::backup_path_for;
use dialectfix_core::ports::WritePort;
use dialectfix_core::MigrationSettings;
use dialectfix_edit::{fix_file, render_patch};
use dialectfix_render::append_fix_report;
use dialectfix_types::wire::DiagnosticsV1;
use dialectfix_types::{FileDiagnostics, FileFixReport};
use fs_err as fs;
use tracing::{debug, error, warn};

#[derive(Debug, Default)]
pub struct ApplySummary {
    /// Unified diff of every changed file.
    pub patch: String,
    pub reports: Vec<FileFixReport>,
    pub files_changed: usize,
    /// Files that only received the header directive.
    pub headers_added: usize,
    pub rejected: usize,
    pub anomalies: usize,
}

impl ApplySummary {
    pub fn fix_count(&self) -> usize {
        self.reports.iter().map(|r| r.fix_count).sum()
    }
}

/// Read and validate a diagnostics receipt.
pub fn load_receipt(path: &Utf8Path) -> anyhow::Result<Vec<FileDiagnostics>> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    let receipt: DiagnosticsV1 =
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path))?;
    if receipt.schema != dialectfix_types::schema::DIALECTFIX_DIAGNOSTICS_V1 {
        bail!(
            "{}: unsupported schema '{}' (expected '{}')",
            path,
            receipt.schema,
            dialectfix_types::schema::DIALECTFIX_DIAGNOSTICS_V1
        );
    }
    Ok(receipt.into_file_diagnostics())
}

/// Fix every file in `files`. Dry-run unless `write` is set.
///
/// A file that cannot be read or written is logged and skipped; the
/// remaining files and the fix report are still processed, then the first
/// such error is returned.
pub fn apply_receipt(
    repo_root: &Utf8Path,
    files: &[FileDiagnostics],
    settings: &MigrationSettings,
    write: bool,
    writer: &dyn WritePort,
) -> anyhow::Result<ApplySummary> {
    let mut summary = ApplySummary::default();
    let mut first_error = None;

    for file in files {
        if !file.has_fixable() && settings.required_header.is_none() {
            continue;
        }
        let path = resolve(repo_root, &file.path);
        if let Err(err) = apply_file(&path, file, settings, write, writer, &mut summary) {
            let msg = format!("{err:#}");
            error!(path = %path, error = %msg, "failed to apply fixes");
            first_error.get_or_insert(err);
        }
    }

    if write && settings.migration_report && !summary.reports.is_empty() {
        if let Err(err) = write_report(&summary.reports, settings, writer) {
            let msg = format!("{err:#}");
            error!(error = %msg, "failed to write fix report");
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(summary),
    }
}

fn apply_file(
    path: &Utf8Path,
    file: &FileDiagnostics,
    settings: &MigrationSettings,
    write: bool,
    writer: &dyn WritePort,
    summary: &mut ApplySummary,
) -> anyhow::Result<()> {
    let Some(original) = writer.read_to_string(path)? else {
        warn!(path = %path, "file in receipt not found, skipping");
        return Ok(());
    };

    let fix = fix_file(&file.path, &original, &file.diagnostics);
    summary.rejected += fix.plan.rejected.len();
    summary.anomalies += fix.anomalies.len();

    let text = match settings.required_header.as_deref() {
        _ if fix.changed => fix.text,
        Some(header) if !original.starts_with(header) => {
            debug!(path = %path, "inserting header directive");
            format!("{header}{original}")
        }
        _ => return Ok(()),
    };

    if write {
        if !settings.no_migration_backup_file {
            writer
                .write_file(&backup_path_for(path), original.as_bytes())
                .with_context(|| format!("back up {}", path))?;
        }
        writer.write_file(path, text.as_bytes())?;
        debug!(path = %path, fixes = fix.report.fix_count, "wrote file");
    }

    summary
        .patch
        .push_str(&render_patch(&file.path, &original, &text));
    summary.files_changed += 1;
    if fix.changed {
        summary.reports.push(fix.report);
    } else {
        summary.headers_added += 1;
    }
    Ok(())
}

fn write_report(
    reports: &[FileFixReport],
    settings: &MigrationSettings,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    let existing = writer.read_to_string(&settings.report_path)?;
    let html = append_fix_report(existing.as_deref(), reports);
    writer
        .write_file(&settings.report_path, html.as_bytes())
        .with_context(|| format!("write fix report {}", settings.report_path))
}

fn resolve(repo_root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}
