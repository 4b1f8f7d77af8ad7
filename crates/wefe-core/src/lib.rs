#![deny(warnings)]

//! Core domain models and invariants for the WEFE dashboard.
//!
//! This crate defines the serializable types exchanged with the simulation
//! engine (configuration, result rows, summaries) together with the two
//! stateful holders the dashboard owns: the [`ConfigStore`] with the baseline
//! and edited configuration, and the [`ScenarioRegistry`] of saved snapshots.

use thiserror::Error;

mod config;
mod results;
mod scenario;

pub use config::{
    fraction_from_percent, percent_view, validate_configuration, CatalogEntry, ConfigStore,
    Configuration, GrowthPreset, GrowthRate, GrowthScenario, ScenarioCatalog,
};
pub use results::{Metric, ResultRow, ResultTable, SimulationRun, Summary};
pub use scenario::{Scenario, ScenarioRegistry};

/// Validation errors for domain invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Growth rates must be finite real numbers.
    #[error("growth rate `{0}` must be a finite number")]
    NonFinite(&'static str),
    /// A scenario needs a non-empty name and at least one result row.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    /// Removal index does not address the current registry.
    #[error("scenario index {index} is out of range (registry holds {len})")]
    IndexOutOfRange {
        /// Index supplied by the caller.
        index: usize,
        /// Registry length at the time of the call.
        len: usize,
    },
}
