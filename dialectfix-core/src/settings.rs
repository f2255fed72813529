//! Clap-free settings for lint and migration runs.

use camino::Utf8PathBuf;
use dialectfix_collect::{AutofixSink, CollectOptions, HighlightPolicy};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MAX_PASS: u32 = 10;
pub const DEFAULT_REPORT_PATH: &str = "dialectfix-fix-report.html";

/// Settings shared by [`run_lint`](crate::run_lint) and
/// [`run_migration`](crate::run_migration).
#[derive(Clone)]
pub struct MigrationSettings {
    // Loop
    pub migration_max_pass: u32,

    // Output
    pub no_migration_backup_file: bool,
    pub migration_report: bool,
    pub report_path: Utf8PathBuf,

    // Eligibility
    pub ide_interactive: bool,
    pub only_syntax: bool,
    pub rule_config_tags: Option<BTreeSet<u32>>,

    /// Directive every migrated file must start with, e.g. `'use static';\n`.
    pub required_header: Option<String>,

    pub autofix_sink: Option<Arc<dyn AutofixSink + Send + Sync>>,
    pub highlight: Option<Arc<dyn HighlightPolicy + Send + Sync>>,
}

impl MigrationSettings {
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            ide_interactive: self.ide_interactive,
            only_syntax: self.only_syntax,
            rule_config_tags: self.rule_config_tags.clone(),
        }
    }
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            migration_max_pass: DEFAULT_MAX_PASS,
            no_migration_backup_file: false,
            migration_report: false,
            report_path: Utf8PathBuf::from(DEFAULT_REPORT_PATH),
            ide_interactive: false,
            only_syntax: false,
            rule_config_tags: None,
            required_header: None,
            autofix_sink: None,
            highlight: None,
        }
    }
}

impl fmt::Debug for MigrationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationSettings")
            .field("migration_max_pass", &self.migration_max_pass)
            .field("no_migration_backup_file", &self.no_migration_backup_file)
            .field("migration_report", &self.migration_report)
            .field("report_path", &self.report_path)
            .field("ide_interactive", &self.ide_interactive)
            .field("only_syntax", &self.only_syntax)
            .field("rule_config_tags", &self.rule_config_tags)
            .field("required_header", &self.required_header)
            .field("autofix_sink", &self.autofix_sink.is_some())
            .field("highlight", &self.highlight.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = MigrationSettings::default();
        assert_eq!(s.migration_max_pass, 10);
        assert!(!s.no_migration_backup_file);
        assert!(!s.migration_report);
        assert!(s.required_header.is_none());
        assert_eq!(s.collect_options(), CollectOptions::default());
    }

    #[test]
    fn debug_hides_callbacks() {
        let dbg = format!("{:?}", MigrationSettings::default());
        assert!(dbg.contains("autofix_sink: false"));
    }
}
