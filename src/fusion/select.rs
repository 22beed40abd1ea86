//! Ranking selection
//!
//! Chooses which normalized rankings take part in fusion. Rankings that agree
//! almost completely with one already chosen add no signal and would bias the
//! fused score toward whichever formula family has the most members, so the
//! overlap-rate technique drops them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::error::{LocalizeError, Result};
use crate::ranking::Ranking;
use crate::spectra::NodeKey;

/// Default number of top-ranked nodes compared by the overlap rate.
pub const DEFAULT_TOP_K: usize = 10;

/// Default overlap above which a candidate counts as redundant.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.5;

/// Which rankings are kept for fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTechnique {
    /// Drop candidates whose top-K overlaps too much with a kept ranking
    #[default]
    OverlapRate,
    /// Keep every candidate
    All,
}

impl fmt::Display for SelectionTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverlapRate => write!(f, "OVERLAP_RATE"),
            Self::All => write!(f, "ALL"),
        }
    }
}

/// Selection technique plus its parameters.
///
/// When a spectra has no more than `top_k` nodes, every candidate's top-K is
/// the whole node set, so every overlap is 1.0 and OVERLAP_RATE keeps only
/// the first candidate. Use a `top_k` below the node count for small spectra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub technique: SelectionTechnique,

    /// Number of top-ranked nodes compared between two rankings
    pub top_k: usize,

    /// Overlap rate (0.0 - 1.0) a candidate must exceed to be dropped
    pub overlap_threshold: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            technique: SelectionTechnique::default(),
            top_k: DEFAULT_TOP_K,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(LocalizeError::InvalidConfig(
                "selection.top_k must be >= 1".to_string(),
            ));
        }
        if !self.overlap_threshold.is_finite() || !(0.0..=1.0).contains(&self.overlap_threshold)
        {
            return Err(LocalizeError::InvalidConfig(format!(
                "selection.overlap_threshold must be within [0, 1], got {}",
                self.overlap_threshold
            )));
        }
        Ok(())
    }

    /// Indices of the candidates kept for fusion, in candidate order.
    ///
    /// Candidates are visited in order and the first is always kept. Under
    /// OVERLAP_RATE a later candidate is dropped iff its overlap rate with
    /// some already kept ranking is strictly greater than the threshold.
    pub fn select<T: NodeKey>(&self, candidates: &[Ranking<T>]) -> Result<Vec<usize>> {
        if candidates.is_empty() {
            return Err(LocalizeError::NoCandidates);
        }

        match self.technique {
            SelectionTechnique::All => Ok((0..candidates.len()).collect()),
            SelectionTechnique::OverlapRate => {
                let mut kept: Vec<usize> = vec![0];
                for (index, candidate) in candidates.iter().enumerate().skip(1) {
                    let redundant_with = kept.iter().copied().find(|&k| {
                        overlap_rate(candidate, &candidates[k], self.top_k)
                            > self.overlap_threshold
                    });
                    match redundant_with {
                        Some(k) => debug!("Candidate {} overlaps candidate {}, dropped", index, k),
                        None => kept.push(index),
                    }
                }
                Ok(kept)
            }
        }
    }
}

/// Share of top-K nodes two rankings have in common.
///
/// With `k = min(top_k, |a|, |b|)` this is `|top_k(a) ∩ top_k(b)| / k`, where
/// each top-K follows its ranking's deterministic order. `k == 0` yields 0.
pub fn overlap_rate<T: NodeKey>(a: &Ranking<T>, b: &Ranking<T>, top_k: usize) -> f64 {
    let k = top_k.min(a.len()).min(b.len());
    if k == 0 {
        return 0.0;
    }
    let top_a: HashSet<&T> = a.nodes().take(k).collect();
    let shared = b.nodes().take(k).filter(|n| top_a.contains(n)).count();
    shared as f64 / k as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(entries: &[(u32, f64)]) -> Ranking<u32> {
        Ranking::from_scores("t", entries.iter().copied()).unwrap()
    }

    fn overlap_config(top_k: usize, overlap_threshold: f64) -> SelectionConfig {
        SelectionConfig {
            technique: SelectionTechnique::OverlapRate,
            top_k,
            overlap_threshold,
        }
    }

    #[test]
    fn test_overlap_rate() {
        let a = ranking(&[(1, 0.9), (2, 0.8), (3, 0.1), (4, 0.0)]);
        let b = ranking(&[(1, 0.9), (3, 0.8), (2, 0.1), (4, 0.0)]);
        let c = ranking(&[(4, 0.9), (3, 0.8), (2, 0.1), (1, 0.0)]);

        assert_eq!(overlap_rate(&a, &a, 2), 1.0);
        assert_eq!(overlap_rate(&a, &b, 2), 0.5);
        assert_eq!(overlap_rate(&a, &c, 2), 0.0);
        // K larger than the rankings compares whole node sets
        assert_eq!(overlap_rate(&a, &c, 10), 1.0);
    }

    #[test]
    fn test_overlap_rate_empty() {
        let a = ranking(&[(1, 0.9)]);
        let empty = ranking(&[]);
        assert_eq!(overlap_rate(&a, &empty, 5), 0.0);
    }

    #[test]
    fn test_select_rejects_no_candidates() {
        let config = SelectionConfig::default();
        let none: Vec<Ranking<u32>> = Vec::new();
        assert_eq!(config.select(&none).unwrap_err(), LocalizeError::NoCandidates);

        let all = SelectionConfig {
            technique: SelectionTechnique::All,
            ..SelectionConfig::default()
        };
        assert_eq!(all.select(&none).unwrap_err(), LocalizeError::NoCandidates);
    }

    #[test]
    fn test_select_drops_redundant() {
        let a = ranking(&[(1, 0.9), (2, 0.8), (3, 0.1), (4, 0.0)]);
        let a_copy = a.clone();
        let c = ranking(&[(4, 0.9), (3, 0.8), (2, 0.1), (1, 0.0)]);

        let kept = overlap_config(2, 0.5)
            .select(&[a.clone(), a_copy, c.clone()])
            .unwrap();
        assert_eq!(kept, vec![0, 2]);
    }

    #[test]
    fn test_select_threshold_is_strict() {
        let a = ranking(&[(1, 0.9), (2, 0.8), (3, 0.1), (4, 0.0)]);
        let b = ranking(&[(1, 0.9), (3, 0.8), (2, 0.1), (4, 0.0)]);

        // overlap is exactly 0.5: not above the threshold, so b is kept
        let kept = overlap_config(2, 0.5).select(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(kept, vec![0, 1]);

        let kept = overlap_config(2, 0.49).select(&[a, b]).unwrap();
        assert_eq!(kept, vec![0]);
    }

    #[test]
    fn test_select_small_rankings_need_smaller_top_k() {
        let a = ranking(&[(1, 0.9), (2, 0.5), (3, 0.1)]);
        let b = ranking(&[(3, 0.9), (2, 0.5), (1, 0.1)]);

        // top_k covers every node: the rankings look identical
        assert_eq!(overlap_rate(&a, &b, DEFAULT_TOP_K), 1.0);
        let kept = SelectionConfig::default().select(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(kept, vec![0]);

        let kept = overlap_config(1, 0.5).select(&[a, b]).unwrap();
        assert_eq!(kept, vec![0, 1]);
    }

    #[test]
    fn test_select_single_candidate() {
        let a = ranking(&[(1, 1.0)]);
        assert_eq!(SelectionConfig::default().select(&[a]).unwrap(), vec![0]);
    }

    #[test]
    fn test_select_all_keeps_everything() {
        let a = ranking(&[(1, 1.0)]);
        let config = SelectionConfig {
            technique: SelectionTechnique::All,
            ..SelectionConfig::default()
        };
        assert_eq!(
            config.select(&[a.clone(), a.clone(), a]).unwrap(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_validate() {
        assert!(SelectionConfig::default().validate().is_ok());
        assert!(overlap_config(0, 0.5).validate().is_err());
        assert!(overlap_config(5, 1.5).validate().is_err());
        assert!(overlap_config(5, -0.1).validate().is_err());
        assert!(overlap_config(5, f64::NAN).validate().is_err());
        assert!(overlap_config(5, 1.0).validate().is_ok());
    }

    #[test]
    fn test_technique_display() {
        assert_eq!(SelectionTechnique::OverlapRate.to_string(), "OVERLAP_RATE");
        assert_eq!(SelectionTechnique::All.to_string(), "ALL");
    }
}
