use crate::line_index::LineIndex;
use crate::node::{HighlightPolicy, NodeSpanHighlight, SyntaxNode, TextRange};
use camino::{Utf8Path, Utf8PathBuf};
use dialectfix_types::{
    Diagnostic, Edit, FaultId, FaultTable, FileDiagnostics, Location, ProjectStats,
};
use std::collections::BTreeSet;
use tracing::info;

static NODE_SPAN: NodeSpanHighlight = NodeSpanHighlight;

/// Side channel notified of every emitted record that carries a fix.
///
/// Called synchronously; implementations must not expect to influence
/// scheduling.
pub trait AutofixSink {
    fn report(&self, path: &Utf8Path, diagnostic: &Diagnostic);
}

/// Options the collector reads from the run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectOptions {
    pub ide_interactive: bool,
    pub only_syntax: bool,
    pub rule_config_tags: Option<BTreeSet<u32>>,
}

/// Which rule tags may be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    All,
    Tags(BTreeSet<u32>),
}

impl Eligibility {
    /// Filtering only applies in interactive mode; the syntax-only sub-mode
    /// uses the table's syntax tags, the full sub-mode the configured tags.
    pub fn for_run(options: &CollectOptions, table: &FaultTable) -> Self {
        if !options.ide_interactive {
            return Eligibility::All;
        }
        if options.only_syntax {
            return Eligibility::Tags(table.syntax_tags.clone());
        }
        match &options.rule_config_tags {
            Some(tags) => Eligibility::Tags(tags.clone()),
            None => Eligibility::All,
        }
    }

    pub fn allows(&self, rule_tag: u32) -> bool {
        match self {
            Eligibility::All => true,
            Eligibility::Tags(tags) => tags.contains(&rule_tag),
        }
    }
}

/// Collects the diagnostics of one file during one lint pass.
pub struct Collector<'a> {
    path: Utf8PathBuf,
    text: &'a str,
    index: LineIndex,
    table: &'a FaultTable,
    highlight: &'a dyn HighlightPolicy,
    sink: Option<&'a dyn AutofixSink>,
    eligibility: Eligibility,
    interactive: bool,
    diagnostics: Vec<Diagnostic>,
    stats: ProjectStats,
}

impl<'a> Collector<'a> {
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        text: &'a str,
        table: &'a FaultTable,
        options: &CollectOptions,
    ) -> Self {
        Self {
            path: path.into(),
            text,
            index: LineIndex::new(text),
            table,
            highlight: &NODE_SPAN,
            sink: None,
            eligibility: Eligibility::for_run(options, table),
            interactive: options.ide_interactive,
            diagnostics: Vec::new(),
            stats: ProjectStats::default(),
        }
    }

    pub fn with_highlight(mut self, highlight: &'a dyn HighlightPolicy) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_sink(mut self, sink: Option<&'a dyn AutofixSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn note_visited(&mut self) {
        self.stats.visited_nodes += 1;
    }

    /// Report `fault_id` on `node`, optionally with a fix and a message
    /// that replaces the table's text.
    pub fn record<N: SyntaxNode + ?Sized>(
        &mut self,
        node: &N,
        fault_id: FaultId,
        fix: Option<Vec<Edit>>,
        message_override: Option<&str>,
    ) {
        let label = node.kind_label();
        self.record_range(node.span(), &label, fault_id, fix, message_override);
    }

    /// Like [`record`](Self::record) for ranges that are not AST nodes,
    /// such as comments.
    pub fn record_range(
        &mut self,
        span: TextRange,
        kind_label: &str,
        fault_id: FaultId,
        fix: Option<Vec<Edit>>,
        message_override: Option<&str>,
    ) {
        let range = self
            .highlight
            .highlight(fault_id, span, self.text)
            .unwrap_or(span);
        let start = self.index.clamp(range.start);
        let end = self.index.clamp(range.end).max(start);

        let rule_tag = self.table.rule_tag(fault_id);
        if !self.eligibility.allows(rule_tag) {
            return;
        }

        let location = self.location(start, end);
        let fix = fix.map(|edits| {
            edits
                .into_iter()
                .map(|mut e| {
                    e.location = Some(self.location(e.start, e.end));
                    e
                })
                .collect::<Vec<_>>()
        });
        let fix_title = fix.as_ref().and_then(|_| self.table.fix_title(fault_id));

        let diagnostic = Diagnostic {
            fault_id,
            severity: self.table.severity(fault_id),
            start,
            end,
            location,
            rule: self.table.resolve_message(fault_id, kind_label, message_override),
            problem: self.table.problem_name(fault_id),
            node_kind: kind_label.to_string(),
            rule_tag,
            fix,
            fix_title,
        };

        if !self.interactive {
            info!(
                "{} ({}, {}): {}",
                self.path, diagnostic.location.line, diagnostic.location.column, diagnostic.rule
            );
        }

        self.stats.record(
            fault_id,
            diagnostic.severity,
            &self.path,
            diagnostic.location.line,
        );

        if let Some(sink) = self.sink
            && diagnostic.is_autofixable()
        {
            sink.report(&self.path, &diagnostic);
        }

        self.diagnostics.push(diagnostic);
    }

    fn location(&self, start: usize, end: usize) -> Location {
        let (line, column) = self.index.line_col(self.text, start).one_based();
        let (end_line, end_column) = self.index.line_col(self.text, end).one_based();
        Location {
            line,
            column,
            end_line,
            end_column,
        }
    }

    pub fn finish(self) -> (FileDiagnostics, ProjectStats) {
        (
            FileDiagnostics {
                path: self.path,
                diagnostics: self.diagnostics,
            },
            self.stats,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::KeywordHighlight;
    use dialectfix_types::{CookbookEntry, FaultAttrs, Severity};
    use pretty_assertions::assert_eq;
    use std::borrow::Cow;
    use std::cell::RefCell;

    const VAR: FaultId = FaultId(1);
    const ANY: FaultId = FaultId(2);

    struct Leaf {
        span: TextRange,
    }

    impl SyntaxNode for Leaf {
        type Kind = u8;

        fn kind(&self) -> u8 {
            0
        }

        fn kind_label(&self) -> Cow<'_, str> {
            Cow::Borrowed("VariableStatement")
        }

        fn span(&self) -> TextRange {
            self.span
        }

        fn children(&self) -> Vec<&Self> {
            vec![]
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: RefCell<Vec<(String, FaultId)>>,
    }

    impl AutofixSink for RecordingSink {
        fn report(&self, path: &Utf8Path, diagnostic: &Diagnostic) {
            self.seen
                .borrow_mut()
                .push((path.to_string(), diagnostic.fault_id));
        }
    }

    fn table() -> FaultTable {
        let mut t = FaultTable::default()
            .with_fault(
                VAR,
                FaultAttrs {
                    name: "VarDeclaration".into(),
                    description: "Use let".into(),
                    severity: Severity::Error,
                    cookbook_ref: 5,
                },
            )
            .with_fault(
                ANY,
                FaultAttrs {
                    name: "AnyType".into(),
                    description: "No any".into(),
                    severity: Severity::Warning,
                    cookbook_ref: 8,
                },
            )
            .with_cookbook(
                5,
                CookbookEntry {
                    tag: "prefer let".into(),
                    fix_title: Some("Use let".into()),
                },
            );
        t.syntax_tags.insert(5);
        t
    }

    #[test]
    fn record_normalizes_positions_one_based() {
        let text = "let a = 0;\n  var x = 1;";
        let t = table();
        let mut c = Collector::new("a.ets", text, &t, &CollectOptions::default());
        c.record(&Leaf { span: TextRange::new(13, 23) }, VAR, None, None);

        let (file, _) = c.finish();
        let d = &file.diagnostics[0];
        assert_eq!((d.start, d.end), (13, 23));
        assert_eq!(
            d.location,
            Location {
                line: 2,
                column: 3,
                end_line: 2,
                end_column: 13
            }
        );
        assert_eq!(d.rule, "prefer let");
        assert_eq!(d.problem, "VarDeclaration");
        assert_eq!(d.node_kind, "VariableStatement");
        assert_eq!(d.rule_tag, 5);
    }

    #[test]
    fn highlight_policy_narrows_range_and_edits_get_locations() {
        let text = "var x = 1;";
        let t = table();
        let policy = KeywordHighlight::new().with_keyword(VAR, "var");
        let mut c = Collector::new("a.ets", text, &t, &CollectOptions::default())
            .with_highlight(&policy);
        c.record(
            &Leaf { span: TextRange::new(0, 10) },
            VAR,
            Some(vec![Edit::new(0, 3, "let")]),
            None,
        );

        let d = &c.diagnostics()[0];
        assert_eq!((d.start, d.end), (0, 3));
        assert_eq!(d.location.end_column, 4);
        let edit = &d.fix.as_ref().unwrap()[0];
        assert_eq!(
            edit.location,
            Some(Location {
                line: 1,
                column: 1,
                end_line: 1,
                end_column: 4
            })
        );
        assert_eq!(d.fix_title.as_deref(), Some("Use let"));
    }

    #[test]
    fn fix_title_absent_without_fix() {
        let text = "var x = 1;";
        let t = table();
        let mut c = Collector::new("a.ets", text, &t, &CollectOptions::default());
        c.record(&Leaf { span: TextRange::new(0, 10) }, VAR, None, None);
        assert_eq!(c.diagnostics()[0].fix_title, None);
    }

    #[test]
    fn offsets_are_clamped_into_the_file() {
        let text = "abc";
        let t = table();
        let mut c = Collector::new("a.ets", text, &t, &CollectOptions::default());
        c.record(&Leaf { span: TextRange::new(2, 50) }, VAR, None, None);
        c.record(&Leaf { span: TextRange::new(3, 1) }, VAR, None, None);
        let ds = c.diagnostics();
        assert_eq!((ds[0].start, ds[0].end), (2, 3));
        assert_eq!((ds[1].start, ds[1].end), (3, 3));
    }

    #[test]
    fn filtering_is_a_no_op_outside_interactive_mode() {
        let t = table();
        let opts = CollectOptions {
            ide_interactive: false,
            only_syntax: true,
            rule_config_tags: Some(BTreeSet::new()),
        };
        let mut c = Collector::new("a.ets", "var x", &t, &opts);
        c.record(&Leaf { span: TextRange::new(0, 5) }, ANY, None, None);
        assert_eq!(c.diagnostics().len(), 1);
    }

    #[test]
    fn syntax_only_mode_uses_table_syntax_tags() {
        let t = table();
        let opts = CollectOptions {
            ide_interactive: true,
            only_syntax: true,
            rule_config_tags: None,
        };
        let mut c = Collector::new("a.ets", "var x", &t, &opts);
        c.record(&Leaf { span: TextRange::new(0, 5) }, VAR, None, None);
        c.record(&Leaf { span: TextRange::new(0, 5) }, ANY, None, None);

        let (file, stats) = c.finish();
        assert_eq!(file.diagnostics.len(), 1);
        assert_eq!(file.diagnostics[0].fault_id, VAR);
        assert_eq!(stats.count(ANY), 0);
    }

    #[test]
    fn full_mode_uses_configured_tags() {
        let t = table();
        let opts = CollectOptions {
            ide_interactive: true,
            only_syntax: false,
            rule_config_tags: Some([8].into_iter().collect()),
        };
        let mut c = Collector::new("a.ets", "var x", &t, &opts);
        c.record(&Leaf { span: TextRange::new(0, 5) }, VAR, None, None);
        c.record(&Leaf { span: TextRange::new(0, 5) }, ANY, None, None);
        assert_eq!(c.diagnostics().len(), 1);
        assert_eq!(c.diagnostics()[0].fault_id, ANY);
    }

    #[test]
    fn full_mode_without_tags_emits_everything() {
        let t = table();
        let opts = CollectOptions {
            ide_interactive: true,
            ..CollectOptions::default()
        };
        assert_eq!(Eligibility::for_run(&opts, &t), Eligibility::All);
    }

    #[test]
    fn stats_and_sink_follow_emitted_records() {
        let text = "var x = 1;\nvar y = 2;";
        let t = table();
        let sink = RecordingSink::default();
        let mut c = Collector::new("src/a.ets", text, &t, &CollectOptions::default())
            .with_sink(Some(&sink));
        c.record(
            &Leaf { span: TextRange::new(0, 10) },
            VAR,
            Some(vec![Edit::new(0, 3, "let")]),
            None,
        );
        c.record(&Leaf { span: TextRange::new(11, 21) }, VAR, None, Some("manual"));
        c.record(&Leaf { span: TextRange::new(11, 21) }, VAR, None, None);

        let (file, stats) = c.finish();
        assert_eq!(file.diagnostics[1].rule, "manual");
        assert_eq!(stats.count(VAR), 3);
        assert_eq!(
            stats.faults[&VAR]
                .lines
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>(),
            vec!["src/a.ets:1", "src/a.ets:2"]
        );
        assert_eq!(
            sink.seen.borrow().as_slice(),
            &[("src/a.ets".to_string(), VAR)]
        );
    }

    #[test]
    fn unknown_fault_uses_node_label() {
        let t = FaultTable::default();
        let mut c = Collector::new("a.ets", "x", &t, &CollectOptions::default());
        c.record(&Leaf { span: TextRange::new(0, 1) }, FaultId(77), None, None);
        let d = &c.diagnostics()[0];
        assert_eq!(d.rule, "VariableStatement");
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.rule_tag, 0);
    }
}
