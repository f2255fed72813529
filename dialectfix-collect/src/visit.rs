use crate::collector::Collector;
use crate::node::SyntaxNode;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Cooperative cancellation flag shared between a host and a running lint.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lint cancelled")]
pub struct Cancelled;

/// A compatibility rule: checks nodes of the kinds it registers for.
pub trait Rule<N: SyntaxNode> {
    fn kinds(&self) -> &[N::Kind];

    fn check(&self, node: &N, collector: &mut Collector<'_>);
}

/// Kind-keyed dispatch table over a set of rules.
///
/// Rules registered for the same kind run in registration order, which
/// together with pre-order traversal fixes the visit order of records.
pub struct RuleSet<N: SyntaxNode> {
    rules: Vec<Box<dyn Rule<N>>>,
    dispatch: HashMap<N::Kind, Vec<usize>>,
}

impl<N: SyntaxNode> Default for RuleSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: SyntaxNode> RuleSet<N> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            dispatch: HashMap::new(),
        }
    }

    pub fn with_rule(mut self, rule: Box<dyn Rule<N>>) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: Box<dyn Rule<N>>) {
        let idx = self.rules.len();
        for kind in rule.kinds() {
            self.dispatch.entry(*kind).or_default().push(idx);
        }
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pre-order walk from `root`, running every rule registered for each
    /// node's kind. Cancellation is polled only at cancellation-point nodes.
    pub fn walk(
        &self,
        root: &N,
        collector: &mut Collector<'_>,
        cancel: &CancellationToken,
    ) -> Result<(), Cancelled> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_cancellation_point() && cancel.is_cancelled() {
                return Err(Cancelled);
            }
            collector.note_visited();

            if let Some(indices) = self.dispatch.get(&node.kind()) {
                for &i in indices {
                    self.rules[i].check(node, collector);
                }
            }

            let children = node.children();
            stack.extend(children.into_iter().rev());
        }
        Ok(())
    }
}
