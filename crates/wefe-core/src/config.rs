//! Simulation configuration, the edit buffer around it, and growth presets.

use crate::ValidationError;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// The four growth knobs exposed on the dashboard form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GrowthRate {
    /// Annual population growth.
    Population,
    /// Annual GDP growth.
    Gdp,
    /// Annual urbanization-rate increment.
    Urbanization,
    /// Annual agricultural-yield growth.
    AgriYield,
}

impl GrowthRate {
    /// All knobs in form order.
    pub const ALL: [GrowthRate; 4] = [
        GrowthRate::Population,
        GrowthRate::Gdp,
        GrowthRate::Urbanization,
        GrowthRate::AgriYield,
    ];

    /// Wire key used by the engine.
    pub fn key(self) -> &'static str {
        match self {
            GrowthRate::Population => "growth_pop",
            GrowthRate::Gdp => "growth_gdp",
            GrowthRate::Urbanization => "growth_urbanization",
            GrowthRate::AgriYield => "growth_agri_yield",
        }
    }
}

/// Growth-scenario block of a configuration.
///
/// Rates are signed fractions (0.025 means 2.5% per year). Keys the dashboard
/// does not edit (for example `growth_energy_efficiency`) are kept in `extra`
/// and sent back to the engine untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthScenario {
    #[serde(default)]
    pub growth_pop: f64,
    #[serde(default)]
    pub growth_gdp: f64,
    #[serde(default)]
    pub growth_urbanization: f64,
    #[serde(default)]
    pub growth_agri_yield: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GrowthScenario {
    /// Read one knob.
    pub fn get(&self, rate: GrowthRate) -> f64 {
        match rate {
            GrowthRate::Population => self.growth_pop,
            GrowthRate::Gdp => self.growth_gdp,
            GrowthRate::Urbanization => self.growth_urbanization,
            GrowthRate::AgriYield => self.growth_agri_yield,
        }
    }

    fn slot_mut(&mut self, rate: GrowthRate) -> &mut f64 {
        match rate {
            GrowthRate::Population => &mut self.growth_pop,
            GrowthRate::Gdp => &mut self.growth_gdp,
            GrowthRate::Urbanization => &mut self.growth_urbanization,
            GrowthRate::AgriYield => &mut self.growth_agri_yield,
        }
    }

    /// Set one knob; non-finite values are rejected and leave the block unchanged.
    pub fn set(&mut self, rate: GrowthRate, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite(rate.key()));
        }
        *self.slot_mut(rate) = value;
        Ok(())
    }

    /// Overwrite the knobs a preset carries. All-or-nothing.
    pub fn apply_preset(&mut self, preset: &GrowthPreset) -> Result<(), ValidationError> {
        let updates: Vec<(GrowthRate, f64)> = GrowthRate::ALL
            .iter()
            .filter_map(|&rate| preset.get(rate).map(|v| (rate, v)))
            .collect();
        if let Some((rate, _)) = updates.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NonFinite(rate.key()));
        }
        for (rate, value) in updates {
            *self.slot_mut(rate) = value;
        }
        Ok(())
    }
}

/// Full simulation configuration as served by the config source.
///
/// `initial_data` and `params` are opaque to the dashboard and passed through
/// to the engine unmodified. `Clone` is a deep copy: every nested value is
/// owned, so a clone never shares mutable structure with its source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub initial_data: Map<String, Value>,
    #[serde(default)]
    pub params: Map<String, Value>,
    pub scenarios: GrowthScenario,
}

/// Check that every growth rate is finite. Everything else is the engine's job.
pub fn validate_configuration(cfg: &Configuration) -> Result<(), ValidationError> {
    for rate in GrowthRate::ALL {
        if !cfg.scenarios.get(rate).is_finite() {
            return Err(ValidationError::NonFinite(rate.key()));
        }
    }
    Ok(())
}

/// Percent view of a fraction with one decimal, as shown in the form.
///
/// Example: `percent_view(0.0176)` is `Some(1.8)`; halves round away from zero.
pub fn percent_view(fraction: f64) -> Option<Decimal> {
    let pct = Decimal::from_f64(fraction)? * Decimal::ONE_HUNDRED;
    Some(pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Fraction from a form percentage; `2.5` becomes `0.025`.
pub fn fraction_from_percent(percent: Decimal) -> Option<f64> {
    (percent / Decimal::ONE_HUNDRED).to_f64()
}

/// Holds the baseline configuration and the working copy being edited.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    baseline: Configuration,
    edited: Configuration,
}

impl ConfigStore {
    /// Start editing from a freshly loaded baseline.
    pub fn new(baseline: Configuration) -> Result<Self, ValidationError> {
        validate_configuration(&baseline)?;
        let edited = baseline.clone();
        Ok(Self { baseline, edited })
    }

    /// Configuration as loaded, without edits.
    pub fn baseline(&self) -> &Configuration {
        &self.baseline
    }

    /// Working copy the form edits.
    pub fn edited(&self) -> &Configuration {
        &self.edited
    }

    /// Independent deep copy of the edited configuration.
    pub fn snapshot(&self) -> Configuration {
        self.edited.clone()
    }

    /// True when the working copy differs from the baseline.
    pub fn is_dirty(&self) -> bool {
        self.edited != self.baseline
    }

    /// Set a knob as a fraction. Non-finite values are refused and the knob
    /// keeps its previous value.
    pub fn set_growth(&mut self, rate: GrowthRate, value: f64) -> Result<(), ValidationError> {
        self.edited.scenarios.set(rate, value)?;
        debug!(key = rate.key(), value, "growth rate edited");
        Ok(())
    }

    /// Set a knob from a form percentage.
    pub fn set_growth_percent(
        &mut self,
        rate: GrowthRate,
        percent: Decimal,
    ) -> Result<(), ValidationError> {
        let fraction =
            fraction_from_percent(percent).ok_or(ValidationError::NonFinite(rate.key()))?;
        self.set_growth(rate, fraction)
    }

    /// Edited knob as shown in the form, one decimal place.
    pub fn growth_percent(&self, rate: GrowthRate) -> Option<Decimal> {
        percent_view(self.edited.scenarios.get(rate))
    }

    /// Overwrite the knobs a preset carries; all or nothing.
    pub fn apply_preset(&mut self, preset: &GrowthPreset) -> Result<(), ValidationError> {
        self.edited.scenarios.apply_preset(preset)
    }

    /// Discard edits and return to the baseline.
    pub fn reset(&mut self) {
        self.edited = self.baseline.clone();
    }

    /// Replace the baseline and discard edits.
    pub fn rebase(&mut self, baseline: Configuration) -> Result<(), ValidationError> {
        validate_configuration(&baseline)?;
        self.edited = baseline.clone();
        self.baseline = baseline;
        Ok(())
    }
}

/// Growth fragment carried by a catalog preset. Absent knobs stay untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthPreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_pop: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_gdp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_urbanization: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_agri_yield: Option<f64>,
}

impl GrowthPreset {
    pub fn get(&self, rate: GrowthRate) -> Option<f64> {
        match rate {
            GrowthRate::Population => self.growth_pop,
            GrowthRate::Gdp => self.growth_gdp,
            GrowthRate::Urbanization => self.growth_urbanization,
            GrowthRate::AgriYield => self.growth_agri_yield,
        }
    }
}

/// One entry of the preset catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Growth fragment (wire key `scenarios`).
    #[serde(rename = "scenarios")]
    pub growth: GrowthPreset,
}

/// Preset catalog keyed by a stable identifier.
pub type ScenarioCatalog = BTreeMap<String, CatalogEntry>;
