//! Suspiciousness Rankings
//!
//! A ranking maps every node to a finite suspiciousness score and fixes a
//! total order over the nodes: descending score, ties broken by ascending
//! node identifier. The order never depends on hashing or insertion order.

use indexmap::{Equivalent, IndexMap};
use std::fmt;
use std::hash::Hash;

use crate::error::{LocalizeError, Result};
use crate::spectra::NodeKey;

/// Immutable node → score assignment in ranked order.
#[derive(Debug, Clone)]
pub struct Ranking<T> {
    /// Entries sorted by (score desc, identifier asc)
    scores: IndexMap<T, f64>,
}

/// Equal when both hold the same entries in the same ranked order.
impl<T: NodeKey> PartialEq for Ranking<T> {
    fn eq(&self, other: &Self) -> bool {
        self.scores.iter().eq(other.scores.iter())
    }
}

/// Best and worst 1-based position of a node when ties are broken
/// optimistically or pessimistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankBounds {
    pub best: usize,
    pub worst: usize,
}

impl RankBounds {
    /// Number of nodes sharing the score (including the node itself).
    pub fn ties(&self) -> usize {
        self.worst + 1 - self.best
    }
}

impl<T: NodeKey> Ranking<T> {
    /// Builds a ranking from raw scores produced by `source`.
    ///
    /// Rejects NaN and infinite scores. `-0.0` is stored as `0.0`. If a node
    /// appears more than once the last score wins.
    pub fn from_scores<I>(source: &str, scores: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut unique: IndexMap<T, f64> = IndexMap::new();
        for (node, score) in scores {
            if !score.is_finite() {
                return Err(LocalizeError::NonFiniteScore {
                    localizer: source.to_string(),
                    node: format!("{node:?}"),
                    score,
                });
            }
            let score = if score == 0.0 { 0.0 } else { score };
            unique.insert(node, score);
        }

        unique.sort_by(|a_node, a_score, b_node, b_score| {
            b_score
                .total_cmp(a_score)
                .then_with(|| a_node.cmp(b_node))
        });

        Ok(Self { scores: unique })
    }

    /// Suspiciousness of `node`; unknown nodes are an error.
    pub fn suspiciousness<Q>(&self, node: &Q) -> Result<f64>
    where
        Q: ?Sized + Hash + Equivalent<T> + fmt::Debug,
    {
        self.scores
            .get(node)
            .copied()
            .ok_or_else(|| LocalizeError::NodeNotFound(format!("{node:?}")))
    }

    /// Score of `node`, or `None` if the ranking does not cover it.
    pub fn get<Q>(&self, node: &Q) -> Option<f64>
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.scores.get(node).copied()
    }

    pub fn contains<Q>(&self, node: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.scores.contains_key(node)
    }

    /// Entries in ranked order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&T, f64)> + '_ {
        self.scores.iter().map(|(node, &score)| (node, score))
    }

    /// Nodes in ranked order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.scores.keys()
    }

    /// The `k` most suspicious entries (fewer if the ranking is shorter).
    pub fn top(&self, k: usize) -> impl Iterator<Item = (&T, f64)> + '_ {
        self.iter().take(k)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn max_score(&self) -> Option<f64> {
        self.scores.first().map(|(_, &s)| s)
    }

    pub fn min_score(&self) -> Option<f64> {
        self.scores.last().map(|(_, &s)| s)
    }

    /// Position bounds of `node` among nodes with equal score.
    pub fn rank_bounds<Q>(&self, node: &Q) -> Result<RankBounds>
    where
        Q: ?Sized + Hash + Equivalent<T> + fmt::Debug,
    {
        let score = self.suspiciousness(node)?;
        let above = self.scores.values().filter(|&&s| s > score).count();
        let tied = self.scores.values().filter(|&&s| s == score).count();
        Ok(RankBounds {
            best: above + 1,
            worst: above + tied,
        })
    }

    /// Nodes a developer inspects before reaching `node`, counting half of
    /// the other nodes tied with it.
    pub fn wasted_effort<Q>(&self, node: &Q) -> Result<f64>
    where
        Q: ?Sized + Hash + Equivalent<T> + fmt::Debug,
    {
        let bounds = self.rank_bounds(node)?;
        Ok((bounds.best - 1) as f64 + (bounds.ties() - 1) as f64 / 2.0)
    }
}

#[cfg(test)]
#[path = "ranking_tests.rs"]
mod tests;
