//! Score fusion
//!
//! Combines normalized rankings into one, using the CombSUM family of
//! score-fusion functions from information retrieval (Fox & Shaw, 1994).

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize::NO_SIGNAL;
use crate::error::{LocalizeError, Result};
use crate::ranking::Ranking;
use crate::spectra::NodeKey;

/// Per-node combination function.
///
/// A ranking that does not cover a node contributes [`NO_SIGNAL`] for it. A
/// score is "nonzero" iff it is not exactly equal to [`NO_SIGNAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFusionTechnique {
    /// Sum of scores
    CombSum,
    /// Sum divided by the number of nonzero scores (0 if there are none)
    #[default]
    CombAnz,
    /// Sum multiplied by the number of nonzero scores
    CombMnz,
    /// Largest score
    CombMax,
    /// Smallest score
    CombMin,
}

impl fmt::Display for DataFusionTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CombSum => write!(f, "COMB_SUM"),
            Self::CombAnz => write!(f, "COMB_ANZ"),
            Self::CombMnz => write!(f, "COMB_MNZ"),
            Self::CombMax => write!(f, "COMB_MAX"),
            Self::CombMin => write!(f, "COMB_MIN"),
        }
    }
}

impl DataFusionTechnique {
    /// Combines one node's scores, one per selected ranking.
    pub fn combine(self, scores: &[f64]) -> f64 {
        let sum: f64 = scores.iter().sum();
        let nonzero = scores.iter().filter(|&&s| s != NO_SIGNAL).count();

        match self {
            Self::CombSum => sum,
            Self::CombAnz => {
                if nonzero == 0 {
                    NO_SIGNAL
                } else {
                    sum / nonzero as f64
                }
            }
            Self::CombMnz => sum * nonzero as f64,
            Self::CombMax => scores
                .iter()
                .copied()
                .reduce(f64::max)
                .unwrap_or(NO_SIGNAL),
            Self::CombMin => scores
                .iter()
                .copied()
                .reduce(f64::min)
                .unwrap_or(NO_SIGNAL),
        }
    }

    /// Fuses `rankings` into a new ranking over the union of their nodes.
    pub fn fuse<T: NodeKey>(self, rankings: &[&Ranking<T>]) -> Result<Ranking<T>> {
        if rankings.is_empty() {
            return Err(LocalizeError::NoCandidates);
        }

        let mut nodes: IndexSet<&T> = IndexSet::new();
        for ranking in rankings {
            nodes.extend(ranking.nodes());
        }

        let mut scores = Vec::with_capacity(rankings.len());
        let fused: Vec<(T, f64)> = nodes
            .into_iter()
            .map(|node| {
                scores.clear();
                scores.extend(rankings.iter().map(|r| r.get(node).unwrap_or(NO_SIGNAL)));
                (node.clone(), self.combine(&scores))
            })
            .collect();

        Ranking::from_scores(&self.to_string(), fused)
    }
}
