//! Ranking normalization
//!
//! Rescales a ranking into a canonical score range so rankings from formulas
//! with very different scales can be combined.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::ranking::Ranking;
use crate::spectra::NodeKey;

/// Score that means "no signal" for a node.
///
/// ZeroOne maps the minimum (and every node of a constant ranking) here, and
/// the fuser counts a node as contributing only when its score differs from it.
pub const NO_SIGNAL: f64 = 0.0;

/// How a ranking is rescaled before fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationStrategy {
    /// Min-max rescale into `[0, 1]`; constant rankings map to 0
    #[default]
    ZeroOne,
    /// `1 / best rank`; tied nodes share their best rank, never 0
    ReciprocalRank,
}

impl fmt::Display for NormalizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroOne => write!(f, "ZeroOne"),
            Self::ReciprocalRank => write!(f, "ReciprocalRank"),
        }
    }
}

impl NormalizationStrategy {
    /// Produces a new, normalized ranking. The input is left untouched.
    pub fn normalize<T: NodeKey>(self, ranking: &Ranking<T>) -> Result<Ranking<T>> {
        match self {
            Self::ZeroOne => zero_one(ranking),
            Self::ReciprocalRank => reciprocal_rank(ranking),
        }
    }
}

fn zero_one<T: NodeKey>(ranking: &Ranking<T>) -> Result<Ranking<T>> {
    let (Some(max), Some(min)) = (ranking.max_score(), ranking.min_score()) else {
        return Ranking::from_scores("zero_one", Vec::new());
    };

    if max == min {
        return Ranking::from_scores(
            "zero_one",
            ranking.nodes().map(|node| (node.clone(), NO_SIGNAL)),
        );
    }

    // Halving keeps the span finite when scores reach f64::MAX
    let (shift, span, scale) = if (max - min).is_finite() {
        (min, max - min, 1.0)
    } else {
        (min / 2.0, max / 2.0 - min / 2.0, 0.5)
    };

    Ranking::from_scores(
        "zero_one",
        ranking.iter().map(|(node, score)| {
            let scaled = ((score * scale - shift) / span).clamp(0.0, 1.0);
            (node.clone(), scaled)
        }),
    )
}

fn reciprocal_rank<T: NodeKey>(ranking: &Ranking<T>) -> Result<Ranking<T>> {
    let mut scores = Vec::with_capacity(ranking.len());
    let mut previous: Option<f64> = None;
    let mut best_rank = 0usize;

    for (position, (node, score)) in ranking.iter().enumerate() {
        if previous != Some(score) {
            best_rank = position + 1;
            previous = Some(score);
        }
        scores.push((node.clone(), 1.0 / best_rank as f64));
    }

    Ranking::from_scores("reciprocal_rank", scores)
}
