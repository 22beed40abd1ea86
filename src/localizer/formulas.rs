//! Built-in SBFL formulas
//!
//! Each formula is a pure `Counts -> f64` function. A division whose
//! denominator is zero resolves to `0.0` unless the formula says otherwise,
//! so every formula returns a finite value for every possible count tuple.
//!
//! References:
//! - Jones & Harrold (2005) "Empirical Evaluation of the Tarantula Automatic Fault-Localization Technique"
//! - Abreu et al. (2007) "On the Accuracy of Spectrum-based Fault Localization"
//! - Wong et al. (2014) "The DStar Method for Effective Software Fault Localization"
//! - Naish et al. (2011) "A Model for Spectra-based Software Diagnosis"

use super::ScoreFn;
use crate::spectra::Counts;

/// Built-in formulas in registration order.
pub(super) const BUILTIN: &[(&str, ScoreFn)] = &[
    ("ochiai", ochiai),
    ("tarantula", tarantula),
    ("jaccard", jaccard),
    ("dstar2", dstar2),
    ("dstar3", dstar3),
    ("op1", op1),
    ("op2", op2),
    ("zoltar", zoltar),
    ("kulczynski2", kulczynski2),
    ("sorensen_dice", sorensen_dice),
    ("anderberg", anderberg),
    ("simple_matching", simple_matching),
    ("rogers_tanimoto", rogers_tanimoto),
    ("russell_rao", russell_rao),
    ("hamann", hamann),
    ("ample", ample),
    ("barinel", barinel),
    ("m2", m2),
    ("goodman", goodman),
    ("euclid", euclid),
    ("hamming", hamming),
    ("wong1", wong1),
    ("wong2", wong2),
    ("wong3", wong3),
];

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Ochiai (cosine similarity): `cf / sqrt((cf + nf) * (cf + cs))`.
pub fn ochiai(c: &Counts) -> f64 {
    let (cf, nf, cs, _) = c.as_f64();
    ratio(cf, ((cf + nf) * (cf + cs)).sqrt())
}

/// Tarantula: failed-coverage rate relative to the sum of failed and passed
/// coverage rates. A rate with no traces of its kind counts as 0.
pub fn tarantula(c: &Counts) -> f64 {
    let (cf, nf, cs, ns) = c.as_f64();
    let fail_ratio = ratio(cf, cf + nf);
    let pass_ratio = ratio(cs, cs + ns);
    ratio(fail_ratio, fail_ratio + pass_ratio)
}

/// Jaccard: `cf / (cf + nf + cs)`.
pub fn jaccard(c: &Counts) -> f64 {
    let (cf, nf, cs, _) = c.as_f64();
    ratio(cf, cf + nf + cs)
}

/// DStar: `cf^star / (cs + nf)`.
///
/// With a zero denominator, a node covered by failing traces scores
/// `f64::MAX` and any other node scores 0.
fn dstar(c: &Counts, star: i32) -> f64 {
    let (cf, nf, cs, _) = c.as_f64();
    let denom = cs + nf;
    if denom > 0.0 {
        cf.powi(star) / denom
    } else if cf > 0.0 {
        f64::MAX
    } else {
        0.0
    }
}

/// DStar with power 2.
pub fn dstar2(c: &Counts) -> f64 {
    dstar(c, 2)
}

/// DStar with power 3.
pub fn dstar3(c: &Counts) -> f64 {
    dstar(c, 3)
}

/// Naish's Op1: `-1` if any failing trace misses the node, otherwise `ns`.
pub fn op1(c: &Counts) -> f64 {
    if c.nf > 0 {
        -1.0
    } else {
        c.ns as f64
    }
}

/// Naish's Op2: `cf - cs / (cs + ns + 1)`. The denominator is never zero.
pub fn op2(c: &Counts) -> f64 {
    let (cf, _, cs, ns) = c.as_f64();
    cf - cs / (cs + ns + 1.0)
}

/// Zoltar: `cf / (cf + nf + cs + 10000 * nf * cs / cf)`; 0 when `cf == 0`.
pub fn zoltar(c: &Counts) -> f64 {
    if c.cf == 0 {
        return 0.0;
    }
    let (cf, nf, cs, _) = c.as_f64();
    ratio(cf, cf + nf + cs + 10_000.0 * nf * cs / cf)
}

/// Kulczynski2: mean of `cf / (cf + nf)` and `cf / (cf + cs)`.
pub fn kulczynski2(c: &Counts) -> f64 {
    let (cf, nf, cs, _) = c.as_f64();
    0.5 * (ratio(cf, cf + nf) + ratio(cf, cf + cs))
}

/// Sorensen-Dice: `2cf / (2cf + nf + cs)`.
pub fn sorensen_dice(c: &Counts) -> f64 {
    let (cf, nf, cs, _) = c.as_f64();
    ratio(2.0 * cf, 2.0 * cf + nf + cs)
}

/// Anderberg: `cf / (cf + 2(nf + cs))`.
pub fn anderberg(c: &Counts) -> f64 {
    let (cf, nf, cs, _) = c.as_f64();
    ratio(cf, cf + 2.0 * (nf + cs))
}

/// Simple matching: `(cf + ns) / total`.
pub fn simple_matching(c: &Counts) -> f64 {
    let (cf, nf, cs, ns) = c.as_f64();
    ratio(cf + ns, cf + nf + cs + ns)
}

/// Rogers-Tanimoto: `(cf + ns) / (cf + ns + 2(nf + cs))`.
pub fn rogers_tanimoto(c: &Counts) -> f64 {
    let (cf, nf, cs, ns) = c.as_f64();
    ratio(cf + ns, cf + ns + 2.0 * (nf + cs))
}

/// Russell-Rao: `cf / total`.
pub fn russell_rao(c: &Counts) -> f64 {
    let (cf, nf, cs, ns) = c.as_f64();
    ratio(cf, cf + nf + cs + ns)
}

/// Hamann: `(cf + ns - nf - cs) / total`.
pub fn hamann(c: &Counts) -> f64 {
    let (cf, nf, cs, ns) = c.as_f64();
    ratio(cf + ns - nf - cs, cf + nf + cs + ns)
}

/// Ample: `|cf / (cf + nf) - cs / (cs + ns)|`.
pub fn ample(c: &Counts) -> f64 {
    let (cf, nf, cs, ns) = c.as_f64();
    (ratio(cf, cf + nf) - ratio(cs, cs + ns)).abs()
}

/// Barinel: `1 - cs / (cs + cf)`. Nodes no trace covers score 0.
pub fn barinel(c: &Counts) -> f64 {
    if c.cf + c.cs == 0 {
        return 0.0;
    }
    let (cf, _, cs, _) = c.as_f64();
    1.0 - cs / (cs + cf)
}

/// M2: `cf / (cf + ns + 2(nf + cs))`.
pub fn m2(c: &Counts) -> f64 {
    let (cf, nf, cs, ns) = c.as_f64();
    ratio(cf, cf + ns + 2.0 * (nf + cs))
}

/// Goodman: `(2cf - nf - cs) / (2cf + nf + cs)`.
pub fn goodman(c: &Counts) -> f64 {
    let (cf, nf, cs, _) = c.as_f64();
    ratio(2.0 * cf - nf - cs, 2.0 * cf + nf + cs)
}

/// Euclid: `sqrt(cf + ns)`.
pub fn euclid(c: &Counts) -> f64 {
    let (cf, _, _, ns) = c.as_f64();
    (cf + ns).sqrt()
}

/// Hamming: `cf + ns`.
pub fn hamming(c: &Counts) -> f64 {
    let (cf, _, _, ns) = c.as_f64();
    cf + ns
}

/// Wong1: `cf`.
pub fn wong1(c: &Counts) -> f64 {
    c.cf as f64
}

/// Wong2: `cf - cs`.
pub fn wong2(c: &Counts) -> f64 {
    let (cf, _, cs, _) = c.as_f64();
    cf - cs
}

/// Wong3: `cf - h`, where `h` discounts passing coverage in three bands.
pub fn wong3(c: &Counts) -> f64 {
    let (cf, _, cs, _) = c.as_f64();
    let h = if c.cs <= 2 {
        cs
    } else if c.cs <= 10 {
        2.0 + 0.1 * (cs - 2.0)
    } else {
        2.8 + 0.001 * (cs - 10.0)
    };
    cf - h
}
