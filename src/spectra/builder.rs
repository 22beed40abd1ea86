//! Incremental spectra construction
//!
//! Coverage providers add nodes and traces, record involvement, then call
//! [`SpectraBuilder::build`] to freeze the result.

use indexmap::{Equivalent, IndexSet};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, info};

use super::{NodeId, NodeKey, Outcome, Spectra, Trace};
use crate::error::{LocalizeError, Result};

/// Mutable staging area for a [`Spectra`].
#[derive(Debug, Clone)]
pub struct SpectraBuilder<T> {
    nodes: IndexSet<T>,
    traces: Vec<Trace>,
}

impl<T: NodeKey> Default for SpectraBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NodeKey> SpectraBuilder<T> {
    pub fn new() -> Self {
        Self {
            nodes: IndexSet::new(),
            traces: Vec::new(),
        }
    }

    /// Adds a node. Adding an identifier twice returns the existing position.
    pub fn add_node(&mut self, identifier: T) -> NodeId {
        let (index, _) = self.nodes.insert_full(identifier);
        NodeId(index)
    }

    pub fn has_node<Q>(&self, identifier: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.nodes.contains(identifier)
    }

    /// Appends a trace and returns its index.
    pub fn add_trace(&mut self, outcome: Outcome) -> usize {
        let index = self.traces.len();
        self.traces.push(Trace::new(index, outcome));
        index
    }

    /// Records that `trace` covered `node`.
    ///
    /// The node must already have been added; unknown nodes are rejected
    /// rather than created. Recording the same pair twice is a no-op.
    pub fn set_involved<Q>(&mut self, trace: usize, node: &Q) -> Result<()>
    where
        Q: ?Sized + Hash + Equivalent<T> + fmt::Debug,
    {
        let count = self.traces.len();
        let node_id = self.nodes.get_index_of(node).map(NodeId);
        let trace_ref = self
            .traces
            .get_mut(trace)
            .ok_or(LocalizeError::UnknownTrace {
                index: trace,
                count,
            })?;
        let node_id = node_id.ok_or_else(|| LocalizeError::UnknownNode {
            trace,
            node: format!("{node:?}"),
        })?;
        trace_ref.involve(node_id);
        Ok(())
    }

    /// Adds a trace covering `nodes`.
    ///
    /// Every node is checked before the trace is added, so a failed call
    /// leaves the builder unchanged.
    pub fn add_trace_with_nodes<I>(&mut self, outcome: Outcome, nodes: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let index = self.traces.len();
        let mut involved = Vec::new();
        for node in nodes {
            let node = node.borrow();
            let id = self
                .nodes
                .get_index_of(node)
                .ok_or_else(|| LocalizeError::UnknownNode {
                    trace: index,
                    node: format!("{node:?}"),
                })?;
            involved.push(NodeId(id));
        }

        let mut trace = Trace::new(index, outcome);
        for id in involved {
            trace.involve(id);
        }
        self.traces.push(trace);
        Ok(index)
    }

    /// Freezes the builder into an immutable spectra.
    pub fn build(self) -> Spectra<T> {
        let spectra = Spectra::freeze(self.nodes, self.traces);
        info!(
            "Built spectra: {} nodes, {} traces ({} failed), {} hits",
            spectra.node_count(),
            spectra.trace_count(),
            spectra.total_failed(),
            spectra.hit_count()
        );
        debug!(
            "Spectra density: {:.6}",
            density(
                spectra.hit_count(),
                spectra.node_count(),
                spectra.trace_count()
            )
        );
        spectra
    }
}

fn density(hits: usize, nodes: usize, traces: usize) -> f64 {
    let cells = nodes as f64 * traces as f64;
    if cells > 0.0 {
        hits as f64 / cells
    } else {
        0.0
    }
}
