mod apply;
mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use dialectfix_core::adapters::FsWritePort;
use dialectfix_render::render_summary_md;
use dialectfix_types::{FaultTable, ProjectStats};
use fs_err as fs;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "dialectfix",
    version,
    about = "Applies dialect-migration autofixes from a diagnostics receipt."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply the fixes in a receipt (default: dry-run, prints the patch).
    Apply(ApplyArgs),
    /// Print a markdown summary of a receipt.
    Summary(SummaryArgs),
}

#[derive(Debug, Parser)]
struct ApplyArgs {
    /// Diagnostics receipt (dialectfix.diagnostics.v1 JSON).
    #[arg(long)]
    diagnostics: Utf8PathBuf,

    /// Repository root; receipt paths are relative to it.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Write fixed files. If omitted, only prints the patch.
    #[arg(long, default_value_t = false)]
    write: bool,

    /// Append applied fixes to the fix report file.
    #[arg(long, default_value_t = false)]
    report: bool,

    /// Fix report location (default: from dialectfix.toml).
    #[arg(long)]
    report_path: Option<Utf8PathBuf>,

    /// Do not write `<file>~` backups.
    #[arg(long, default_value_t = false)]
    no_backup: bool,
}

#[derive(Debug, Parser)]
struct SummaryArgs {
    /// Diagnostics receipt (dialectfix.diagnostics.v1 JSON).
    #[arg(long)]
    diagnostics: Utf8PathBuf,

    /// Repository root, used to find dialectfix.toml.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Fault table JSON used to name faults.
    #[arg(long)]
    fault_table: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Summary(args) => cmd_summary(args),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let file_config =
        config::load_or_default(&args.repo_root).context("load dialectfix.toml config")?;
    let settings = ConfigMerger::new(file_config).merge_apply_args(
        &args.repo_root,
        args.no_backup,
        args.report,
        args.report_path,
    );
    debug!("merged settings: {:?}", settings);

    let files = apply::load_receipt(&args.diagnostics)?;
    let summary = apply::apply_receipt(
        &args.repo_root,
        &files,
        &settings,
        args.write,
        &FsWritePort,
    )?;

    if summary.rejected > 0 {
        info!(
            rejected = summary.rejected,
            "fixes skipped: they overlap earlier fixes"
        );
    }
    if summary.headers_added > 0 {
        info!(
            files = summary.headers_added,
            "header directive added to files without fixes"
        );
    }
    if summary.anomalies > 0 {
        warn!(
            anomalies = summary.anomalies,
            "edits dropped: receipt offsets do not match the files"
        );
    }

    if args.write {
        println!(
            "applied {} fix(es) in {} file(s)",
            summary.fix_count(),
            summary.files_changed
        );
    } else {
        print!("{}", summary.patch);
        println!(
            "dry-run: {} fix(es) in {} file(s); rerun with --write to apply",
            summary.fix_count(),
            summary.files_changed
        );
    }
    Ok(())
}

fn cmd_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let file_config =
        config::load_or_default(&args.repo_root).context("load dialectfix.toml config")?;
    let table = match ConfigMerger::new(file_config).fault_table(&args.repo_root, args.fault_table)
    {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("read {}", path))?;
            FaultTable::from_json(&json).with_context(|| format!("parse {}", path))?
        }
        None => FaultTable::default(),
    };

    let files = apply::load_receipt(&args.diagnostics)?;
    let mut stats = ProjectStats::default();
    for file in &files {
        for d in &file.diagnostics {
            stats.record(d.fault_id, d.severity, &file.path, d.location.line);
        }
    }

    print!("{}", render_summary_md(&stats, &table, None, &[]));
    Ok(())
}
