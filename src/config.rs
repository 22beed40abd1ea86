use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LocalizeError, Result};
use crate::fusion::{DataFusionTechnique, NormalizationStrategy, SelectionConfig};

/// Fusing localizer configuration
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration:
///
/// ```toml
/// normalization = "zero_one"
/// fusion = "comb_anz"
/// formulas = ["ochiai", "tarantula", "dstar2"]
///
/// [selection]
/// technique = "overlap_rate"
/// top_k = 10
/// overlap_threshold = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// How each formula's ranking is rescaled before fusion
    pub normalization: NormalizationStrategy,

    /// How the selected rankings are combined
    pub fusion: DataFusionTechnique,

    /// Formulas to run, by registry name (empty = all registered formulas)
    pub formulas: Vec<String>,

    /// Which rankings are combined
    pub selection: SelectionConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            normalization: NormalizationStrategy::default(),
            fusion: DataFusionTechnique::default(),
            formulas: vec![],
            selection: SelectionConfig::default(),
        }
    }
}

impl FusionConfig {
    /// Configuration with explicit strategies and every registered formula.
    pub fn new(
        normalization: NormalizationStrategy,
        selection: SelectionConfig,
        fusion: DataFusionTechnique,
    ) -> Self {
        Self {
            normalization,
            selection,
            fusion,
            formulas: vec![],
        }
    }

    /// Restrict the formulas to run.
    pub fn with_formulas<I, S>(mut self, formulas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formulas = formulas.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.selection.validate()?;
        if let Some(dup) = self
            .formulas
            .iter()
            .enumerate()
            .find(|(i, name)| self.formulas[..*i].contains(*name))
            .map(|(_, name)| name)
        {
            return Err(LocalizeError::InvalidConfig(format!(
                "formula '{dup}' listed more than once"
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("malformed fusion configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
