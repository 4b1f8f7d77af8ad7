//! Named scenario snapshots and the ordered registry that holds them.

use crate::{Configuration, ResultTable, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Immutable snapshot of a configuration and the results it produced.
///
/// Fields are private: once created a scenario never changes, so later edits
/// or re-runs cannot leak into a saved comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    config: Configuration,
    results: ResultTable,
}

impl Scenario {
    /// Build a scenario. Names must contain a non-whitespace character and
    /// the table must hold at least one row.
    pub fn new(
        name: impl Into<String>,
        config: Configuration,
        results: ResultTable,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidScenario(
                "scenario name must not be empty".into(),
            ));
        }
        if results.is_empty() {
            return Err(ValidationError::InvalidScenario(format!(
                "scenario `{name}` has no result rows"
            )));
        }
        Ok(Self {
            name,
            config,
            results,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn results(&self) -> &ResultTable {
        &self.results
    }
}

/// Ordered collection of saved scenarios.
///
/// Insertion order is preserved. Removing index `i` shifts every later entry
/// down by one; indices always refer to the sequence as it is at call time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioRegistry {
    scenarios: Vec<Scenario>,
}

impl ScenarioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scenario and return its index.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        config: Configuration,
        results: ResultTable,
    ) -> Result<usize, ValidationError> {
        let scenario = Scenario::new(name, config, results)?;
        let index = self.scenarios.len();
        info!(index, name = scenario.name(), rows = scenario.results().len(), "scenario saved");
        self.scenarios.push(scenario);
        Ok(index)
    }

    /// Remove the scenario at `index`, compacting the sequence.
    pub fn remove_at(&mut self, index: usize) -> Result<Scenario, ValidationError> {
        let len = self.scenarios.len();
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len });
        }
        let removed = self.scenarios.remove(index);
        info!(index, name = removed.name(), "scenario removed");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.scenarios.clear();
    }

    pub fn all(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
