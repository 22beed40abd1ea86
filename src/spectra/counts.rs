//! Per-node hit/miss counts
//!
//! The four-cell contingency table every formula consumes.

use serde::{Deserialize, Serialize};

/// Hit/miss counts of a single node across all traces of a spectra.
///
/// `cf + nf` is the number of failed traces and `cs + ns` the number of passed
/// traces; both sums are identical for every node of the same spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Counts {
    /// Failed traces covering the node
    pub cf: usize,
    /// Failed traces not covering the node
    pub nf: usize,
    /// Passed traces covering the node
    pub cs: usize,
    /// Passed traces not covering the node
    pub ns: usize,
}

impl Counts {
    pub fn new(cf: usize, nf: usize, cs: usize, ns: usize) -> Self {
        Self { cf, nf, cs, ns }
    }

    /// Total failed traces.
    pub fn failed(&self) -> usize {
        self.cf + self.nf
    }

    /// Total passed traces.
    pub fn passed(&self) -> usize {
        self.cs + self.ns
    }

    /// Total traces.
    pub fn total(&self) -> usize {
        self.failed() + self.passed()
    }

    /// Counts as floats, in `(cf, nf, cs, ns)` order.
    pub fn as_f64(&self) -> (f64, f64, f64, f64) {
        (
            self.cf as f64,
            self.nf as f64,
            self.cs as f64,
            self.ns as f64,
        )
    }
}

impl std::fmt::Display for Counts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cf={} nf={} cs={} ns={}",
            self.cf, self.nf, self.cs, self.ns
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_totals() {
        let c = Counts::new(2, 1, 5, 7);
        assert_eq!(c.failed(), 3);
        assert_eq!(c.passed(), 12);
        assert_eq!(c.total(), 15);
        assert_eq!(c.as_f64(), (2.0, 1.0, 5.0, 7.0));
    }

    #[test]
    fn test_counts_display() {
        assert_eq!(Counts::new(1, 0, 3, 4).to_string(), "cf=1 nf=0 cs=3 ns=4");
    }
}
