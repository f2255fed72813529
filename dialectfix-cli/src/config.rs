//! Configuration file loading for dialectfix.
//!
//! Discovers and loads `dialectfix.toml` from the repository root and merges
//! it with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use dialectfix_core::MigrationSettings;
use dialectfix_core::settings::DEFAULT_REPORT_PATH;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "dialectfix.toml";

/// Top-level configuration from dialectfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialectfixConfig {
    pub migration: MigrationConfig,
    pub lint: LintConfig,
}

/// `[migration]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationConfig {
    /// Write `<file>~` backups before overwriting.
    pub backup: bool,

    /// Append applied fixes to the fix report file.
    pub report: bool,

    /// Fix report location, relative to the repository root.
    pub report_path: Utf8PathBuf,

    /// Directive inserted at the top of receipt files the fixes leave untouched.
    pub required_header: Option<String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            backup: true,
            report: false,
            report_path: Utf8PathBuf::from(DEFAULT_REPORT_PATH),
            required_header: None,
        }
    }
}

/// `[lint]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Fault table JSON used to name faults in summaries.
    pub fault_table: Option<Utf8PathBuf>,
}

pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<DialectfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<DialectfixConfig> {
    let config: DialectfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from repo root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<DialectfixConfig> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(DialectfixConfig::default()),
    }
}

/// Builder for merging the config file with CLI arguments.
pub struct ConfigMerger {
    config: DialectfixConfig,
}

impl ConfigMerger {
    pub fn new(config: DialectfixConfig) -> Self {
        Self { config }
    }

    /// Settings for `apply`.
    ///
    /// `--no-backup` and `--report` only ever switch behaviour on; an
    /// explicit `--report-path` replaces the configured one. Relative report
    /// paths resolve against `repo_root`.
    pub fn merge_apply_args(
        self,
        repo_root: &Utf8Path,
        no_backup: bool,
        report: bool,
        report_path: Option<Utf8PathBuf>,
    ) -> MigrationSettings {
        let migration = self.config.migration;
        let report_path = report_path.unwrap_or(migration.report_path);

        MigrationSettings {
            no_migration_backup_file: no_backup || !migration.backup,
            migration_report: report || migration.report,
            report_path: resolve(repo_root, report_path),
            required_header: migration.required_header,
            ..MigrationSettings::default()
        }
    }

    /// Fault table path for `summary`, CLI first.
    pub fn fault_table(
        &self,
        repo_root: &Utf8Path,
        cli: Option<Utf8PathBuf>,
    ) -> Option<Utf8PathBuf> {
        cli.or_else(|| {
            self.config
                .lint
                .fault_table
                .clone()
                .map(|p| resolve(repo_root, p))
        })
    }
}

fn resolve(repo_root: &Utf8Path, path: Utf8PathBuf) -> Utf8PathBuf {
    if path.is_absolute() {
        path
    } else {
        repo_root.join(path)
    }
}
