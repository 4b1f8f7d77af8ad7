#![deny(warnings)]

//! Chart projection: turns result tables into render-ready series bundles.
//!
//! Everything here is pure. Two modes are supported:
//! - single: one result table, one series per metric of a family
//! - comparison: every saved scenario, one series per scenario per family,
//!   coloured by position in a fixed cyclic palette

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wefe_core::{Metric, ResultTable, Scenario};

/// Errors produced by projection helpers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// Comparison mode needs at least one scenario to take the year axis from.
    #[error("comparison projection requires at least one scenario")]
    EmptyComparisonSet,
}

/// Grouping of related result columns drawn on one chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    Water,
    Food,
    Energy,
    Ecology,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 4] = [
        MetricFamily::Water,
        MetricFamily::Food,
        MetricFamily::Energy,
        MetricFamily::Ecology,
    ];

    /// Stable surface key.
    pub fn key(self) -> &'static str {
        match self {
            MetricFamily::Water => "water",
            MetricFamily::Food => "food",
            MetricFamily::Energy => "energy",
            MetricFamily::Ecology => "ecology",
        }
    }

    /// Series drawn for a single result table.
    pub fn single_series(self) -> &'static [SeriesSpec] {
        match self {
            MetricFamily::Water => &WATER_SERIES,
            MetricFamily::Food => &FOOD_SERIES,
            MetricFamily::Energy => &ENERGY_SERIES,
            MetricFamily::Ecology => &ECOLOGY_SERIES,
        }
    }

    /// Metric compared across scenarios, with its label suffix.
    pub fn comparison_metric(self) -> (Metric, &'static str) {
        match self {
            MetricFamily::Water => (Metric::WaterRatio, "Water ratio"),
            MetricFamily::Food => (Metric::FoodRatio, "Food security ratio"),
            MetricFamily::Energy => (Metric::EnergyRatio, "Energy ratio"),
            MetricFamily::Ecology => (Metric::TotalCo2, "CO₂ emissions (Mt)"),
        }
    }
}

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` form.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Comparison palette, reused cyclically.
pub const PALETTE: [Rgb; 5] = [
    Rgb(102, 126, 234),
    Rgb(245, 87, 108),
    Rgb(79, 172, 254),
    Rgb(67, 233, 123),
    Rgb(240, 147, 251),
];

/// Palette slot for the scenario at `scenario_index`. Depends on nothing else.
pub fn palette_index(scenario_index: usize) -> usize {
    scenario_index % PALETTE.len()
}

/// Static description of one single-mode series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesSpec {
    pub metric: Metric,
    pub label: &'static str,
    pub color: Rgb,
    pub fill: bool,
}

const WATER_SERIES: [SeriesSpec; 2] = [
    SeriesSpec {
        metric: Metric::WaterDemand,
        label: "Water demand",
        color: Rgb(0x3b, 0x82, 0xf6),
        fill: false,
    },
    SeriesSpec {
        metric: Metric::WaterSupply,
        label: "Water supply",
        color: Rgb(0x60, 0xa5, 0xfa),
        fill: false,
    },
];

const FOOD_SERIES: [SeriesSpec; 1] = [SeriesSpec {
    metric: Metric::FoodRatio,
    label: "Food security ratio",
    color: Rgb(0x10, 0xb9, 0x81),
    fill: false,
}];

const ENERGY_SERIES: [SeriesSpec; 2] = [
    SeriesSpec {
        metric: Metric::EnergyDemand,
        label: "Energy demand",
        color: Rgb(0xf5, 0x9e, 0x0b),
        fill: false,
    },
    SeriesSpec {
        metric: Metric::EnergySupply,
        label: "Energy supply",
        color: Rgb(0xfb, 0xbf, 0x24),
        fill: false,
    },
];

const ECOLOGY_SERIES: [SeriesSpec; 1] = [SeriesSpec {
    metric: Metric::TotalCo2,
    label: "CO₂ emissions (Mt)",
    color: Rgb(0x8b, 0x5c, 0xf6),
    fill: true,
}];

/// One named line on a chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    /// One value per axis label.
    pub values: Vec<f64>,
    pub color: Rgb,
    /// Set in comparison mode only.
    pub palette_index: Option<usize>,
    pub fill: bool,
}

/// Shared year axis plus aligned series, ready for a chart surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesBundle {
    pub family: MetricFamily,
    pub labels: Vec<i32>,
    pub series: Vec<Series>,
}

impl SeriesBundle {
    /// True when every series has exactly one value per label.
    pub fn is_aligned(&self) -> bool {
        self.series.iter().all(|s| s.values.len() == self.labels.len())
    }
}

/// Single-scenario projection of one family.
pub fn project_single(family: MetricFamily, table: &ResultTable) -> SeriesBundle {
    let series = family
        .single_series()
        .iter()
        .map(|def| Series {
            label: def.label.to_string(),
            values: table.column(def.metric),
            color: def.color,
            palette_index: None,
            fill: def.fill,
        })
        .collect();
    SeriesBundle {
        family,
        labels: table.years(),
        series,
    }
}

/// Single-scenario projection for all four families, in family order.
pub fn project_single_all(table: &ResultTable) -> Vec<SeriesBundle> {
    MetricFamily::ALL
        .iter()
        .map(|&family| project_single(family, table))
        .collect()
}

/// Comparison projection of one family.
///
/// The axis comes from the first scenario; the others are assumed to share it.
pub fn project_comparison(
    family: MetricFamily,
    scenarios: &[Scenario],
) -> Result<SeriesBundle, ProjectionError> {
    let first = scenarios.first().ok_or(ProjectionError::EmptyComparisonSet)?;
    let (metric, suffix) = family.comparison_metric();
    let fill = family == MetricFamily::Ecology;
    let series = scenarios
        .iter()
        .enumerate()
        .map(|(i, scenario)| {
            let slot = palette_index(i);
            Series {
                label: format!("{} - {}", scenario.name(), suffix),
                values: scenario.results().column(metric),
                color: PALETTE[slot],
                palette_index: Some(slot),
                fill,
            }
        })
        .collect();
    Ok(SeriesBundle {
        family,
        labels: first.results().years(),
        series,
    })
}

/// Comparison projection for all four families, in family order.
pub fn project_comparison_all(scenarios: &[Scenario]) -> Result<Vec<SeriesBundle>, ProjectionError> {
    MetricFamily::ALL
        .iter()
        .map(|&family| project_comparison(family, scenarios))
        .collect()
}
