use dialectfix_types::FaultId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node of the AST supplied by the compiler.
pub trait SyntaxNode {
    type Kind: Copy + Eq + Hash + Debug;

    fn kind(&self) -> Self::Kind;

    /// Name of the node kind, used as the record's `type` and as the message
    /// of last resort.
    fn kind_label(&self) -> Cow<'_, str>;

    /// Source span of the node, without leading trivia.
    fn span(&self) -> TextRange;

    fn children(&self) -> Vec<&Self>;

    /// Cancellation is only polled at these nodes.
    fn is_cancellation_point(&self) -> bool {
        false
    }
}

/// Per-fault highlight range.
///
/// Returning `None` keeps the node's own span.
pub trait HighlightPolicy {
    fn highlight(&self, fault_id: FaultId, span: TextRange, text: &str) -> Option<TextRange>;
}

/// Always highlights the whole node.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSpanHighlight;

impl HighlightPolicy for NodeSpanHighlight {
    fn highlight(&self, _fault_id: FaultId, _span: TextRange, _text: &str) -> Option<TextRange> {
        None
    }
}

/// Highlights only the leading keyword for the configured faults,
/// e.g. `var` in `var x = 1;`.
#[derive(Debug, Clone, Default)]
pub struct KeywordHighlight {
    keywords: HashMap<FaultId, String>,
}

impl KeywordHighlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, fault_id: FaultId, keyword: impl Into<String>) -> Self {
        self.keywords.insert(fault_id, keyword.into());
        self
    }
}

impl HighlightPolicy for KeywordHighlight {
    fn highlight(&self, fault_id: FaultId, span: TextRange, text: &str) -> Option<TextRange> {
        let keyword = self.keywords.get(&fault_id)?;
        let node_text = text.get(span.start..span.end)?;
        if !node_text.starts_with(keyword.as_str()) {
            return None;
        }
        Some(TextRange::new(span.start, span.start + keyword.len()))
    }
}
