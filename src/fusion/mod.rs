//! Fusing Fault Localizer
//!
//! Runs several base localizers over one spectra and fuses their rankings:
//!
//! ```text
//! localizers -> rankings -> normalize -> select -> fuse -> ranking
//! ```
//!
//! Each stage is a pure transform picked by configuration. The fused
//! localizer is itself a [`FaultLocalizer`], so it can be nested inside
//! another fused localizer or compared against a single formula.
//!
//! Reference: Lucia, Lo & Xia (2014) "Fusion Fault Localizers" - ASE

pub mod combine;
pub mod normalize;
pub mod select;

pub use combine::DataFusionTechnique;
pub use normalize::{NormalizationStrategy, NO_SIGNAL};
pub use select::{overlap_rate, SelectionConfig, SelectionTechnique};

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::FusionConfig;
use crate::error::Result;
use crate::localizer::{FaultLocalizer, FormulaRegistry};
use crate::ranking::Ranking;
use crate::spectra::{NodeKey, Spectra};

/// Fused ranking plus which base localizers contributed to it.
#[derive(Debug, Clone)]
pub struct FusionReport<T> {
    pub ranking: Ranking<T>,
    /// Localizers whose rankings were fused, in evaluation order
    pub selected: Vec<String>,
    /// Localizers dropped by selection, in evaluation order
    pub dropped: Vec<String>,
}

/// Localizer that fuses the rankings of several base localizers.
pub struct FusingLocalizer<T: NodeKey> {
    name: String,
    normalization: NormalizationStrategy,
    selection: SelectionConfig,
    fusion: DataFusionTechnique,
    localizers: Vec<Arc<dyn FaultLocalizer<T>>>,
}

impl<T: NodeKey + 'static> FusingLocalizer<T> {
    /// Fused localizer over the built-in formulas named by `config`.
    pub fn new(config: &FusionConfig) -> Result<Self> {
        Self::with_registry(config, &FormulaRegistry::builtin())
    }

    /// Fused localizer whose formula names resolve against `registry`.
    pub fn with_registry(config: &FusionConfig, registry: &FormulaRegistry) -> Result<Self> {
        config.validate()?;
        let localizers = registry
            .resolve(&config.formulas)?
            .into_iter()
            .map(|formula| Arc::new(formula) as Arc<dyn FaultLocalizer<T>>)
            .collect();
        Self::from_localizers(config, localizers)
    }

    /// Fused localizer over arbitrary base localizers.
    ///
    /// `config.formulas` is ignored; the localizers are evaluated in the
    /// given order, which is also the order selection visits them in.
    pub fn from_localizers(
        config: &FusionConfig,
        localizers: Vec<Arc<dyn FaultLocalizer<T>>>,
    ) -> Result<Self> {
        config.selection.validate()?;
        Ok(Self {
            name: format!(
                "fused({}, {}, {})",
                config.normalization, config.selection.technique, config.fusion
            ),
            normalization: config.normalization,
            selection: config.selection.clone(),
            fusion: config.fusion,
            localizers,
        })
    }

    /// Replaces the generated name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn localizer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.localizers.iter().map(|l| l.name())
    }

    /// Runs the full pipeline and reports which localizers were fused.
    pub fn localize_detailed(&self, spectra: &Spectra<T>) -> Result<FusionReport<T>> {
        info!(
            "Fusing {} localizers over {} nodes ({}, {}, {})",
            self.localizers.len(),
            spectra.node_count(),
            self.normalization,
            self.selection.technique,
            self.fusion
        );

        let rankings = self.evaluate(spectra)?;

        let normalized = rankings
            .iter()
            .map(|ranking| self.normalization.normalize(ranking))
            .collect::<Result<Vec<_>>>()?;

        let kept = self.selection.select(&normalized)?;
        let mut selected = Vec::with_capacity(kept.len());
        let mut dropped = Vec::new();
        for (index, localizer) in self.localizers.iter().enumerate() {
            if kept.contains(&index) {
                selected.push(localizer.name().to_string());
            } else {
                dropped.push(localizer.name().to_string());
            }
        }
        debug!("Selected localizers: {:?}", selected);
        if !dropped.is_empty() {
            debug!("Dropped redundant localizers: {:?}", dropped);
        }

        let inputs: Vec<&Ranking<T>> = kept.iter().map(|&i| &normalized[i]).collect();
        let ranking = self.fusion.fuse(&inputs)?;
        info!(
            "Fused {} of {} rankings into {} nodes",
            selected.len(),
            self.localizers.len(),
            ranking.len()
        );

        Ok(FusionReport {
            ranking,
            selected,
            dropped,
        })
    }

    /// Runs every base localizer; the first failure aborts the whole run.
    #[cfg(not(feature = "rayon"))]
    fn evaluate(&self, spectra: &Spectra<T>) -> Result<Vec<Ranking<T>>> {
        self.localizers
            .iter()
            .map(|localizer| localizer.localize(spectra))
            .collect()
    }

    /// Runs every base localizer in parallel; results keep localizer order.
    #[cfg(feature = "rayon")]
    fn evaluate(&self, spectra: &Spectra<T>) -> Result<Vec<Ranking<T>>> {
        use rayon::prelude::*;

        self.localizers
            .par_iter()
            .map(|localizer| localizer.localize(spectra))
            .collect()
    }
}

impl<T: NodeKey + 'static> FaultLocalizer<T> for FusingLocalizer<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn localize(&self, spectra: &Spectra<T>) -> Result<Ranking<T>> {
        self.localize_detailed(spectra).map(|report| report.ranking)
    }
}

#[cfg(test)]
#[path = "fusion_tests.rs"]
mod tests;
