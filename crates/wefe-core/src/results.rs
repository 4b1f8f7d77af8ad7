//! Result rows, tables and run summaries returned by the engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Named metric columns the dashboard charts or exports by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    WaterDemand,
    WaterSupply,
    WaterRatio,
    FoodDemand,
    FoodSupply,
    FoodRatio,
    EnergyDemand,
    EnergySupply,
    EnergyRatio,
    TotalCo2,
}

impl Metric {
    /// Column order used for exports.
    pub const ALL: [Metric; 10] = [
        Metric::WaterDemand,
        Metric::WaterSupply,
        Metric::WaterRatio,
        Metric::FoodDemand,
        Metric::FoodSupply,
        Metric::FoodRatio,
        Metric::EnergyDemand,
        Metric::EnergySupply,
        Metric::EnergyRatio,
        Metric::TotalCo2,
    ];

    /// Column name on the wire.
    pub fn column(self) -> &'static str {
        match self {
            Metric::WaterDemand => "water_demand",
            Metric::WaterSupply => "water_supply",
            Metric::WaterRatio => "water_ratio",
            Metric::FoodDemand => "food_demand_total",
            Metric::FoodSupply => "food_supply_total",
            Metric::FoodRatio => "food_ratio",
            Metric::EnergyDemand => "energy_demand",
            Metric::EnergySupply => "energy_supply",
            Metric::EnergyRatio => "energy_ratio",
            Metric::TotalCo2 => "total_co2",
        }
    }
}

/// One simulated year.
///
/// The engine sends its whole state per year; columns without a typed field
/// land in `extra` and survive export unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Calendar year, starting at `initial_data.year`.
    pub year: i32,
    /// Total water demand (hm³).
    pub water_demand: f64,
    /// Renewable water available (hm³).
    pub water_supply: f64,
    /// Supply over demand; below 1.0 means stress.
    pub water_ratio: f64,
    /// Food demand across all groups (kt).
    pub food_demand_total: f64,
    /// Domestic food production (kt).
    pub food_supply_total: f64,
    /// Self-sufficiency: supply over demand.
    pub food_ratio: f64,
    /// Final energy demand (PJ).
    pub energy_demand: f64,
    /// Domestic energy supply (PJ).
    pub energy_supply: f64,
    /// Supply over demand.
    pub energy_ratio: f64,
    /// Emissions for the year (Mt CO₂).
    pub total_co2: f64,
    /// Every other engine column, keyed by name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ResultRow {
    /// Value of a typed metric column.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::WaterDemand => self.water_demand,
            Metric::WaterSupply => self.water_supply,
            Metric::WaterRatio => self.water_ratio,
            Metric::FoodDemand => self.food_demand_total,
            Metric::FoodSupply => self.food_supply_total,
            Metric::FoodRatio => self.food_ratio,
            Metric::EnergyDemand => self.energy_demand,
            Metric::EnergySupply => self.energy_supply,
            Metric::EnergyRatio => self.energy_ratio,
            Metric::TotalCo2 => self.total_co2,
        }
    }
}

/// Rows ordered by increasing year, exactly as the engine produced them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable(Vec<ResultRow>);

impl ResultTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Year axis, unmodified.
    pub fn years(&self) -> Vec<i32> {
        self.0.iter().map(|r| r.year).collect()
    }

    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.0.iter().map(|r| r.metric(metric)).collect()
    }

    pub fn years_strictly_increasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0].year < w[1].year)
    }

    /// Union of untyped column names across all rows, sorted.
    pub fn extra_columns(&self) -> BTreeSet<&str> {
        self.0
            .iter()
            .flat_map(|r| r.extra.keys().map(String::as_str))
            .collect()
    }
}

impl From<Vec<ResultRow>> for ResultTable {
    fn from(rows: Vec<ResultRow>) -> Self {
        Self(rows)
    }
}

/// End-state figures computed once per run by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_years: u32,
    pub start_year: i32,
    pub end_year: i32,
    pub final_water_ratio: f64,
    pub final_food_ratio: f64,
    pub final_energy_ratio: f64,
    /// Missing from older engines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_energy_demand: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_energy_supply: Option<f64>,
    pub total_co2_emissions: f64,
    pub avg_water_stress: f64,
}

/// One successful engine response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub results: ResultTable,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_json(year: i32) -> Value {
        json!({
            "year": year,
            "population": 103_000_000.0 + year as f64,
            "water_demand": 80.5, "water_supply": 190.2, "water_ratio": 2.36,
            "food_demand_total": 10.0, "food_supply_total": 9.0, "food_ratio": 0.9,
            "energy_demand": 8000.0, "energy_supply": 7000.0, "energy_ratio": 0.875,
            "total_co2": 450.0, "total_cod": 12.5
        })
    }

    #[test]
    fn engine_rows_keep_untyped_columns() {
        let table: ResultTable =
            serde_json::from_value(json!([row_json(2005), row_json(2006)])).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.years(), vec![2005, 2006]);
        assert_eq!(table.column(Metric::FoodRatio), vec![0.9, 0.9]);
        let extras: Vec<&str> = table.extra_columns().into_iter().collect();
        assert_eq!(extras, vec!["population", "total_cod"]);
        let back = serde_json::to_value(&table).unwrap();
        assert_eq!(back[1]["total_cod"], json!(12.5));
    }

    #[test]
    fn year_order_check() {
        let rows: ResultTable =
            serde_json::from_value(json!([row_json(0), row_json(1), row_json(1)])).unwrap();
        assert!(!rows.years_strictly_increasing());
        assert!(ResultTable::default().years_strictly_increasing());
    }

    #[test]
    fn missing_metric_column_is_rejected() {
        let mut broken = row_json(2005);
        broken.as_object_mut().unwrap().remove("water_ratio");
        assert!(serde_json::from_value::<ResultRow>(broken).is_err());
    }

    #[test]
    fn summary_accepts_older_engine_shape() {
        let s: Summary = serde_json::from_value(json!({
            "total_years": 30, "start_year": 2005, "end_year": 2034,
            "final_water_ratio": 2.1, "final_food_ratio": 0.95, "final_energy_ratio": 0.7,
            "total_co2_emissions": 15000.0, "avg_water_stress": 2.4
        }))
        .unwrap();
        assert_eq!(s.final_energy_demand, None);
        assert_eq!(s.end_year, 2034);
    }
}
