//! Diagnostic collection.
//!
//! Rule code (external) visits AST nodes and calls [`Collector::record`]; the
//! collector turns each call into a normalized [`Diagnostic`](dialectfix_types::Diagnostic):
//! - highlight range from the node span or a per-fault [`HighlightPolicy`];
//! - 1-based line/column through a [`LineIndex`];
//! - message and severity from the fault table;
//! - eligibility filtering in interactive modes;
//! - statistics and the optional [`AutofixSink`].
//!
//! [`RuleSet`] is the kind-keyed dispatch that drives rule code over a tree.

mod collector;
mod line_index;
mod node;
mod visit;

pub use collector::{AutofixSink, CollectOptions, Collector, Eligibility};
pub use line_index::{LineCol, LineIndex};
pub use node::{HighlightPolicy, KeywordHighlight, NodeSpanHighlight, SyntaxNode, TextRange};
pub use visit::{CancellationToken, Cancelled, Rule, RuleSet};
