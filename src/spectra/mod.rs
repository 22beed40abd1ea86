//! Program Spectra
//!
//! Immutable record of which nodes (program elements) each trace (test
//! execution) covered, plus every trace's pass/fail outcome.
//!
//! Involvement is stored sparsely as paired adjacency lists: each trace keeps
//! the set of nodes it covers and each node keeps the ascending list of traces
//! covering it. Memory is proportional to the number of hits, not to
//! `nodes × traces`.
//!
//! A `Spectra` is produced by [`SpectraBuilder::build`] and never changes
//! afterwards, so it can be shared across threads without locking.

mod builder;
mod counts;

pub use builder::SpectraBuilder;
pub use counts::Counts;

use indexmap::{Equivalent, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use crate::error::{LocalizeError, Result};

/// Bounds every node identifier must satisfy.
///
/// `Ord` supplies the documented tie-break for rankings; `Hash + Eq` supply
/// constant-time lookup.
pub trait NodeKey: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

/// Position of a node inside its spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Zero-based insertion index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Borrowed view of a node: its position and identifier.
#[derive(Debug, PartialEq, Eq)]
pub struct Node<'a, T> {
    id: NodeId,
    identifier: &'a T,
}

impl<T> Clone for Node<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Node<'_, T> {}

impl<'a, T> Node<'a, T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn identifier(&self) -> &'a T {
        self.identifier
    }
}

impl<T> From<Node<'_, T>> for NodeId {
    fn from(node: Node<'_, T>) -> Self {
        node.id
    }
}

/// Outcome of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
}

impl Outcome {
    pub fn is_failed(self) -> bool {
        matches!(self, Outcome::Failed)
    }

    /// Maps a success flag (as coverage providers usually report it) to an outcome.
    pub fn from_success(successful: bool) -> Self {
        if successful {
            Outcome::Passed
        } else {
            Outcome::Failed
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASSED"),
            Outcome::Failed => write!(f, "FAILED"),
        }
    }
}

/// One test execution: its outcome and the nodes it covered.
#[derive(Debug, Clone)]
pub struct Trace {
    index: usize,
    outcome: Outcome,
    involved: IndexSet<NodeId>,
}

impl Trace {
    pub(crate) fn new(index: usize, outcome: Outcome) -> Self {
        Self {
            index,
            outcome,
            involved: IndexSet::new(),
        }
    }

    pub(crate) fn involve(&mut self, node: NodeId) {
        self.involved.insert(node);
    }

    /// Position of the trace inside its spectra.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_failed(&self) -> bool {
        self.outcome.is_failed()
    }

    /// Whether this trace covered `node`. Constant time.
    pub fn is_involved(&self, node: impl Into<NodeId>) -> bool {
        self.involved.contains(&node.into())
    }

    /// Covered nodes in the order their involvement was recorded.
    pub fn involved_nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.involved.iter().copied()
    }

    pub fn involvement_count(&self) -> usize {
        self.involved.len()
    }
}

/// Frozen node/trace/involvement store.
#[derive(Debug, Clone)]
pub struct Spectra<T> {
    nodes: IndexSet<T>,
    traces: Vec<Trace>,
    /// Per node, ascending indices of the traces covering it
    node_traces: Vec<Vec<usize>>,
    total_failed: usize,
}

impl<T: NodeKey> Spectra<T> {
    pub(crate) fn freeze(nodes: IndexSet<T>, traces: Vec<Trace>) -> Self {
        let mut node_traces = vec![Vec::new(); nodes.len()];
        for trace in &traces {
            for node in trace.involved_nodes() {
                node_traces[node.index()].push(trace.index());
            }
        }
        let total_failed = traces.iter().filter(|t| t.is_failed()).count();

        Self {
            nodes,
            traces,
            node_traces,
            total_failed,
        }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = Node<'_, T>> + '_ {
        self.nodes.iter().enumerate().map(|(index, identifier)| Node {
            id: NodeId(index),
            identifier,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn has_node<Q>(&self, identifier: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.nodes.contains(identifier)
    }

    /// Looks up a node by identifier. Constant time.
    pub fn get_node<Q>(&self, identifier: &Q) -> Result<Node<'_, T>>
    where
        Q: ?Sized + Hash + Equivalent<T> + fmt::Debug,
    {
        self.nodes
            .get_full(identifier)
            .map(|(index, identifier)| Node {
                id: NodeId(index),
                identifier,
            })
            .ok_or_else(|| LocalizeError::NodeNotFound(format!("{identifier:?}")))
    }

    /// Node at a position, if the position exists.
    pub fn node(&self, id: NodeId) -> Option<Node<'_, T>> {
        self.nodes
            .get_index(id.index())
            .map(|identifier| Node { id, identifier })
    }

    /// Traces in insertion order.
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn trace(&self, index: usize) -> Option<&Trace> {
        self.traces.get(index)
    }

    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    pub fn failed_traces(&self) -> impl Iterator<Item = &Trace> + '_ {
        self.traces.iter().filter(|t| t.is_failed())
    }

    pub fn passed_traces(&self) -> impl Iterator<Item = &Trace> + '_ {
        self.traces.iter().filter(|t| !t.is_failed())
    }

    pub fn total_failed(&self) -> usize {
        self.total_failed
    }

    pub fn total_passed(&self) -> usize {
        self.traces.len() - self.total_failed
    }

    /// Total number of recorded (trace, node) involvement pairs.
    pub fn hit_count(&self) -> usize {
        self.node_traces.iter().map(Vec::len).sum()
    }

    /// Ascending indices of the traces covering `node`.
    ///
    /// Unknown positions yield an empty slice.
    pub fn covering_traces(&self, node: impl Into<NodeId>) -> &[usize] {
        self.node_traces
            .get(node.into().index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Hit/miss counts of a node, computed from its covering-trace list.
    pub fn counts(&self, node: impl Into<NodeId>) -> Counts {
        let covering = self.covering_traces(node);
        let cf = covering
            .iter()
            .filter(|&&t| self.traces[t].is_failed())
            .count();
        let cs = covering.len() - cf;

        Counts {
            cf,
            nf: self.total_failed - cf,
            cs,
            ns: self.total_passed() - cs,
        }
    }

    /// Counts of every node, in node order.
    #[cfg(not(feature = "rayon"))]
    pub fn all_counts(&self) -> Vec<Counts> {
        (0..self.nodes.len())
            .map(|index| self.counts(NodeId(index)))
            .collect()
    }

    /// Counts of every node, in node order.
    #[cfg(feature = "rayon")]
    pub fn all_counts(&self) -> Vec<Counts> {
        use rayon::prelude::*;

        (0..self.nodes.len())
            .into_par_iter()
            .map(|index| self.counts(NodeId(index)))
            .collect()
    }
}

#[cfg(test)]
#[path = "spectra_tests.rs"]
mod tests;
