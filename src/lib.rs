//! Spectrum-based fault localization with formula fusion.
//!
//! A [`Spectra`] records which program elements each test execution touched
//! and whether it passed. Formulas score every element from its
//! failed/passed involvement counts; a [`FusingLocalizer`] runs many formulas,
//! normalizes their rankings, drops redundant ones and fuses the rest.
//!
//! ```
//! use sbfl::{FaultLocalizer, FusingLocalizer, FusionConfig, Outcome, SpectraBuilder};
//!
//! let mut builder = SpectraBuilder::new();
//! for line in ["a.rs:3", "a.rs:9", "a.rs:10"] {
//!     builder.add_node(line.to_string());
//! }
//! builder
//!     .add_trace_with_nodes(Outcome::Failed, ["a.rs:9".to_string(), "a.rs:10".to_string()])
//!     .unwrap();
//! let spectra = builder.build();
//!
//! let localizer = FusingLocalizer::new(&FusionConfig::default()).unwrap();
//! let ranking = localizer.localize(&spectra).unwrap();
//! assert_eq!(ranking.len(), 3);
//! assert!(ranking.suspiciousness("a.rs:9").unwrap() > ranking.suspiciousness("a.rs:3").unwrap());
//! ```

pub mod config;
pub mod error;
pub mod fusion;
pub mod localizer;
pub mod ranking;
pub mod spectra;

// Re-export key types for convenience
pub use config::FusionConfig;
pub use error::{LocalizeError, Result};
pub use fusion::{
    DataFusionTechnique, FusingLocalizer, FusionReport, NormalizationStrategy, SelectionConfig,
    SelectionTechnique,
};
pub use localizer::{FaultLocalizer, Formula, FormulaRegistry};
pub use ranking::{RankBounds, Ranking};
pub use spectra::{Counts, Node, NodeId, NodeKey, Outcome, Spectra, SpectraBuilder, Trace};
