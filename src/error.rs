//! Localization errors
//!
//! Every error the core can raise. All of them are deterministic functions of
//! the input spectra and configuration, so callers treat each one as fatal to
//! the `localize` call that produced it.

use thiserror::Error;

/// Errors that can occur while building spectra or localizing faults
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalizeError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Trace {trace} references unknown node {node}")]
    UnknownNode { trace: usize, node: String },

    #[error("Unknown trace index {index} (spectra has {count} traces)")]
    UnknownTrace { index: usize, count: usize },

    #[error("Localizer '{localizer}' produced non-finite score {score} for node {node}")]
    NonFiniteScore {
        localizer: String,
        node: String,
        score: f64,
    },

    #[error("Selection requires at least one candidate ranking")]
    NoCandidates,

    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Formula already registered: {0}")]
    DuplicateFormula(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, LocalizeError>;
