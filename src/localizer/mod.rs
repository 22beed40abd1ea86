//! Fault Localizers
//!
//! The [`FaultLocalizer`] contract turns a frozen spectra into a ranking.
//! Single-formula localizers are [`Formula`] values: a name plus a pure
//! `Counts -> f64` function. Formulas are looked up by name in a
//! [`FormulaRegistry`], so adding one never touches normalization, selection
//! or fusion.

pub mod formulas;

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

use crate::error::{LocalizeError, Result};
use crate::ranking::Ranking;
use crate::spectra::{Counts, NodeKey, Spectra};

/// Anything that can rank the nodes of a spectra by suspiciousness.
pub trait FaultLocalizer<T: NodeKey>: Send + Sync {
    /// Name used in logs, errors and selection reports.
    fn name(&self) -> &str;

    /// Computes a ranking covering every node of `spectra`.
    fn localize(&self, spectra: &Spectra<T>) -> Result<Ranking<T>>;
}

/// Pure suspiciousness function over a node's counts.
pub type ScoreFn = fn(&Counts) -> f64;

/// A named SBFL formula.
#[derive(Clone)]
pub struct Formula {
    name: Cow<'static, str>,
    score: ScoreFn,
}

impl Formula {
    pub fn new(name: impl Into<Cow<'static, str>>, score: ScoreFn) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the formula to one node's counts.
    pub fn score(&self, counts: &Counts) -> f64 {
        (self.score)(counts)
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula").field("name", &self.name).finish()
    }
}

impl<T: NodeKey> FaultLocalizer<T> for Formula {
    fn name(&self) -> &str {
        &self.name
    }

    fn localize(&self, spectra: &Spectra<T>) -> Result<Ranking<T>> {
        debug!("Evaluating formula {} over {} nodes", self.name, spectra.node_count());
        let counts = spectra.all_counts();
        Ranking::from_scores(
            &self.name,
            spectra
                .nodes()
                .zip(counts.iter())
                .map(|(node, c)| (node.identifier().clone(), self.score(c))),
        )
    }
}

/// Ordered, name-keyed set of formulas.
#[derive(Debug, Clone)]
pub struct FormulaRegistry {
    formulas: IndexMap<String, Formula>,
}

impl Default for FormulaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormulaRegistry {
    /// Registry without any formula.
    pub fn empty() -> Self {
        Self {
            formulas: IndexMap::new(),
        }
    }

    /// Registry holding every built-in formula, Ochiai first.
    pub fn builtin() -> Self {
        let formulas = formulas::BUILTIN
            .iter()
            .map(|&(name, score)| (name.to_string(), Formula::new(name, score)))
            .collect();
        Self { formulas }
    }

    /// Adds a formula; names must be unique.
    pub fn register(&mut self, formula: Formula) -> Result<()> {
        if self.formulas.contains_key(formula.name()) {
            return Err(LocalizeError::DuplicateFormula(formula.name().to_string()));
        }
        self.formulas.insert(formula.name().to_string(), formula);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Formula> {
        self.formulas
            .get(name)
            .ok_or_else(|| LocalizeError::UnknownFormula(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formulas.contains_key(name)
    }

    /// Formulas for `names`, in the caller's order.
    ///
    /// An empty list selects every registered formula in registration order.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<Formula>> {
        if names.is_empty() {
            return Ok(self.formulas.values().cloned().collect());
        }
        names
            .iter()
            .map(|name| self.get(name).cloned())
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.formulas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Formula> + '_ {
        self.formulas.values()
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

#[cfg(test)]
#[path = "localizer_tests.rs"]
mod tests;
