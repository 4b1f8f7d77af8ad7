//! Application state and command handling.
//!
//! Every user action enters through [`Dashboard::dispatch`] or the run
//! methods, and comes back as the list of chart redraws it requires. Failed
//! actions leave the prior state untouched.

use export::ExportError;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};
use wefe_charts::{project_comparison_all, project_single_all, ProjectionError, SeriesBundle};
use wefe_core::{
    ConfigStore, Configuration, GrowthRate, ResultTable, ScenarioCatalog, ScenarioRegistry,
    SimulationRun, Summary, ValidationError,
};
use wefe_gateway::{CatalogSource, ConfigSource, GatewayError, SimulationGateway};

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The baseline was never loaded; edits and runs need it.
    #[error("no configuration loaded")]
    NoConfiguration,
    /// Save or export attempted before any successful run.
    #[error("nothing has been simulated yet")]
    NoActiveResult,
    /// Another run holds the dashboard.
    #[error("a simulation run is already in progress")]
    RunPending,
    /// The ticket belongs to another run or another dashboard.
    #[error("run ticket does not match the run in progress")]
    StaleRun,
    /// Preset key absent from the loaded catalog.
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
    /// Bad edit, bad scenario or stale removal index.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Comparison requested with nothing to compare.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// Engine, config source or catalog failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Flat vocabulary of failures, for callers that only need to branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigLoadFailed,
    SimulationFailed,
    CatalogLoadFailed,
    InvalidScenario,
    InvalidValue,
    IndexOutOfRange,
    NoActiveResult,
    EmptyComparisonSet,
    NoConfiguration,
    RunPending,
    StaleRun,
    UnknownPreset,
    ExportFailed,
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoConfiguration => ErrorKind::NoConfiguration,
            Self::NoActiveResult => ErrorKind::NoActiveResult,
            Self::RunPending => ErrorKind::RunPending,
            Self::StaleRun => ErrorKind::StaleRun,
            Self::UnknownPreset(_) => ErrorKind::UnknownPreset,
            Self::Validation(ValidationError::NonFinite(_)) => ErrorKind::InvalidValue,
            Self::Validation(ValidationError::InvalidScenario(_)) => ErrorKind::InvalidScenario,
            Self::Validation(ValidationError::IndexOutOfRange { .. }) => ErrorKind::IndexOutOfRange,
            Self::Projection(ProjectionError::EmptyComparisonSet) => ErrorKind::EmptyComparisonSet,
            Self::Gateway(GatewayError::ConfigLoadFailed(_)) => ErrorKind::ConfigLoadFailed,
            Self::Gateway(GatewayError::SimulationFailed(_)) => ErrorKind::SimulationFailed,
            Self::Gateway(GatewayError::CatalogLoadFailed(_)) => ErrorKind::CatalogLoadFailed,
            Self::Export(_) => ErrorKind::ExportFailed,
        }
    }
}

fn surfaced(err: DashboardError) -> DashboardError {
    warn!(kind = ?err.kind(), error = %err, "dashboard action failed");
    err
}

/// Which projection produced a redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartMode {
    Single,
    Comparison,
}

/// One surface to re-render, with the data to render.
#[derive(Clone, Debug, PartialEq)]
pub struct Redraw {
    pub mode: ChartMode,
    pub bundle: SeriesBundle,
}

/// User actions that do not talk to the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetGrowth { rate: GrowthRate, value: f64 },
    SetGrowthPercent { rate: GrowthRate, percent: Decimal },
    ApplyPreset { key: String },
    ResetConfig,
    SaveScenario { name: String },
    RemoveScenario { index: usize },
    ClearScenarios,
}

/// The most recent successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveResult {
    /// Configuration that was submitted for this run.
    pub config: Configuration,
    pub years: u32,
    pub results: ResultTable,
    pub summary: Summary,
}

/// Proof that a run was started; required to complete it.
///
/// Only the dashboard that issued a ticket accepts it. A ticket that will not
/// be completed must be handed back through [`Dashboard::abandon_run`].
#[derive(Debug)]
pub struct RunTicket {
    owner: u64,
    generation: u64,
    config: Configuration,
    years: u32,
}

impl RunTicket {
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn years(&self) -> u32 {
        self.years
    }
}

static NEXT_DASHBOARD: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct Dashboard {
    id: u64,
    config: Option<ConfigStore>,
    catalog: ScenarioCatalog,
    active: Option<ActiveResult>,
    scenarios: ScenarioRegistry,
    pending: Option<u64>,
    generation: u64,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            id: NEXT_DASHBOARD.fetch_add(1, Ordering::Relaxed),
            config: None,
            catalog: ScenarioCatalog::new(),
            active: None,
            scenarios: ScenarioRegistry::new(),
            pending: None,
            generation: 0,
        }
    }
}

/// Clears the pending run if the owning future is dropped before completion.
struct PendingRun<'a> {
    dashboard: &'a mut Dashboard,
    generation: u64,
}

impl Drop for PendingRun<'_> {
    fn drop(&mut self) {
        if self.dashboard.pending == Some(self.generation) {
            self.dashboard.pending = None;
            warn!(generation = self.generation, "simulation run dropped before completion");
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard with an already loaded baseline.
    pub fn with_config(baseline: Configuration) -> Result<Self, DashboardError> {
        Ok(Self {
            config: Some(ConfigStore::new(baseline)?),
            ..Self::default()
        })
    }

    /// Fetch the baseline. A reload replaces the baseline and discards edits.
    /// On failure an existing configuration is kept untouched and a dashboard
    /// that never loaded one stays unusable.
    pub async fn load_config(&mut self, source: &dyn ConfigSource) -> Result<(), DashboardError> {
        let baseline = source.load().await.map_err(|e| surfaced(e.into()))?;
        let loaded = match self.config.as_mut() {
            Some(store) => store.rebase(baseline),
            None => ConfigStore::new(baseline).map(|store| self.config = Some(store)),
        };
        loaded.map_err(|e| surfaced(GatewayError::ConfigLoadFailed(e.to_string()).into()))?;
        if let Some(store) = &self.config {
            info!(
                initial_keys = store.baseline().initial_data.len(),
                param_keys = store.baseline().params.len(),
                "baseline configuration loaded"
            );
        }
        Ok(())
    }

    /// Replace the preset catalog; returns the number of presets.
    pub async fn load_catalog(&mut self, source: &dyn CatalogSource) -> Result<usize, DashboardError> {
        let catalog = source.catalog().await.map_err(|e| surfaced(e.into()))?;
        Ok(self.set_catalog(catalog))
    }

    pub fn set_catalog(&mut self, catalog: ScenarioCatalog) -> usize {
        self.catalog = catalog;
        debug!(presets = self.catalog.len(), "catalog replaced");
        self.catalog.len()
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn config(&self) -> Option<&ConfigStore> {
        self.config.as_ref()
    }

    pub fn active(&self) -> Option<&ActiveResult> {
        self.active.as_ref()
    }

    pub fn scenarios(&self) -> &ScenarioRegistry {
        &self.scenarios
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Redraw>, DashboardError> {
        self.handle(command).map_err(surfaced)
    }

    fn handle(&mut self, command: Command) -> Result<Vec<Redraw>, DashboardError> {
        match command {
            Command::SetGrowth { rate, value } => {
                self.config_mut()?.set_growth(rate, value)?;
                Ok(Vec::new())
            }
            Command::SetGrowthPercent { rate, percent } => {
                self.config_mut()?.set_growth_percent(rate, percent)?;
                Ok(Vec::new())
            }
            Command::ApplyPreset { key } => {
                let preset = match self.catalog.get(&key) {
                    Some(entry) => entry.growth.clone(),
                    None => return Err(DashboardError::UnknownPreset(key)),
                };
                self.config_mut()?.apply_preset(&preset)?;
                info!(preset = %key, "preset applied");
                Ok(Vec::new())
            }
            Command::ResetConfig => {
                self.config_mut()?.reset();
                Ok(Vec::new())
            }
            Command::SaveScenario { name } => {
                let active = self.active.as_ref().ok_or(DashboardError::NoActiveResult)?;
                self.scenarios
                    .add(name, active.config.clone(), active.results.clone())?;
                self.comparison_view()
            }
            Command::RemoveScenario { index } => {
                self.scenarios.remove_at(index)?;
                self.current_view()
            }
            Command::ClearScenarios => {
                self.scenarios.clear();
                info!("scenarios cleared");
                self.current_view()
            }
        }
    }

    fn config_mut(&mut self) -> Result<&mut ConfigStore, DashboardError> {
        self.config.as_mut().ok_or(DashboardError::NoConfiguration)
    }

    /// Snapshot the edited configuration and mark a run as in progress.
    pub fn begin_run(&mut self, years: u32) -> Result<RunTicket, DashboardError> {
        self.try_begin_run(years).map_err(surfaced)
    }

    fn try_begin_run(&mut self, years: u32) -> Result<RunTicket, DashboardError> {
        if self.pending.is_some() {
            return Err(DashboardError::RunPending);
        }
        if years == 0 {
            return Err(GatewayError::SimulationFailed(
                "simulation horizon must be at least one year".into(),
            )
            .into());
        }
        let config = self
            .config
            .as_ref()
            .ok_or(DashboardError::NoConfiguration)?
            .snapshot();
        self.generation += 1;
        self.pending = Some(self.generation);
        debug!(generation = self.generation, years, "run started");
        Ok(RunTicket {
            owner: self.id,
            generation: self.generation,
            config,
            years,
        })
    }

    /// Finish the run a ticket belongs to. Success replaces the active result
    /// and redraws every surface in single mode; failure keeps the old one.
    pub fn complete_run(
        &mut self,
        ticket: RunTicket,
        outcome: Result<SimulationRun, GatewayError>,
    ) -> Result<Vec<Redraw>, DashboardError> {
        if !self.owns(&ticket) {
            return Err(surfaced(DashboardError::StaleRun));
        }
        self.pending = None;
        let run = outcome.map_err(|e| surfaced(e.into()))?;
        info!(
            years = ticket.years,
            rows = run.results.len(),
            "active result replaced"
        );
        let redraws = single_view(&run.results);
        self.active = Some(ActiveResult {
            config: ticket.config,
            years: ticket.years,
            results: run.results,
            summary: run.summary,
        });
        Ok(redraws)
    }

    /// Give up on a started run without touching the active result.
    pub fn abandon_run(&mut self, ticket: RunTicket) -> Result<(), DashboardError> {
        if !self.owns(&ticket) {
            return Err(surfaced(DashboardError::StaleRun));
        }
        self.pending = None;
        info!(generation = ticket.generation, "run abandoned");
        Ok(())
    }

    fn owns(&self, ticket: &RunTicket) -> bool {
        ticket.owner == self.id && self.pending == Some(ticket.generation)
    }

    /// Start, await and complete one run. Dropping the returned future before
    /// it resolves releases the pending run.
    pub async fn run_simulation(
        &mut self,
        gateway: &dyn SimulationGateway,
        years: u32,
    ) -> Result<Vec<Redraw>, DashboardError> {
        let ticket = self.begin_run(years)?;
        let guard = PendingRun {
            generation: ticket.generation,
            dashboard: self,
        };
        let outcome = gateway.run(ticket.config(), ticket.years()).await;
        guard.dashboard.complete_run(ticket, outcome)
    }

    /// What the surfaces should show now: comparison while scenarios exist,
    /// otherwise the active result, otherwise nothing.
    pub fn current_view(&self) -> Result<Vec<Redraw>, DashboardError> {
        if !self.scenarios.is_empty() {
            return self.comparison_view();
        }
        Ok(self
            .active
            .as_ref()
            .map(|a| single_view(&a.results))
            .unwrap_or_default())
    }

    fn comparison_view(&self) -> Result<Vec<Redraw>, DashboardError> {
        Ok(project_comparison_all(self.scenarios.all())?
            .into_iter()
            .map(|bundle| Redraw {
                mode: ChartMode::Comparison,
                bundle,
            })
            .collect())
    }

    pub fn export_csv(&self) -> Result<Vec<u8>, DashboardError> {
        let active = self.require_active()?;
        export::to_csv(&active.results).map_err(|e| surfaced(e.into()))
    }

    pub fn export_json(&self) -> Result<String, DashboardError> {
        let active = self.require_active()?;
        export::to_json(&active.results).map_err(|e| surfaced(e.into()))
    }

    fn require_active(&self) -> Result<&ActiveResult, DashboardError> {
        self.active
            .as_ref()
            .ok_or_else(|| surfaced(DashboardError::NoActiveResult))
    }
}

fn single_view(table: &ResultTable) -> Vec<Redraw> {
    project_single_all(table)
        .into_iter()
        .map(|bundle| Redraw {
            mode: ChartMode::Single,
            bundle,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use wefe_charts::MetricFamily;
    use wefe_core::{CatalogEntry, GrowthPreset, ResultRow};

    fn baseline() -> Configuration {
        serde_json::from_value(json!({
            "initial_data": { "year": 2005, "population": 103.0 },
            "params": { "water_per_capita": 0.8 },
            "scenarios": {
                "growth_pop": 0.0115, "growth_gdp": 0.01,
                "growth_urbanization": 0.0176, "growth_agri_yield": 0.022
            }
        }))
        .unwrap()
    }

    fn run(years: u32, growth_pop: f64) -> SimulationRun {
        let rows: Vec<ResultRow> = (0..=years as i32)
            .map(|y| ResultRow {
                year: 2005 + y,
                water_demand: 80.0 * (1.0 + growth_pop).powi(y),
                water_supply: 190.0,
                water_ratio: 190.0 / (80.0 * (1.0 + growth_pop).powi(y)),
                food_demand_total: 120.0,
                food_supply_total: 110.0,
                food_ratio: 0.92,
                energy_demand: 8000.0,
                energy_supply: 7000.0,
                energy_ratio: 0.875,
                total_co2: 450.0 + y as f64,
                extra: BTreeMap::new(),
            })
            .collect();
        SimulationRun {
            summary: Summary {
                total_years: years,
                start_year: 2005,
                end_year: 2005 + years as i32,
                final_water_ratio: rows[rows.len() - 1].water_ratio,
                final_food_ratio: 0.92,
                final_energy_ratio: 0.875,
                final_energy_demand: Some(8000.0),
                final_energy_supply: Some(7000.0),
                total_co2_emissions: rows.iter().map(|r| r.total_co2).sum(),
                avg_water_stress: 0.4,
            },
            results: rows.into(),
        }
    }

    fn simulated(years: u32) -> Dashboard {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        let ticket = dash.begin_run(years).unwrap();
        let growth = ticket.config().scenarios.growth_pop;
        dash.complete_run(ticket, Ok(run(years, growth))).unwrap();
        dash
    }

    fn save(dash: &mut Dashboard, name: &str) -> Result<Vec<Redraw>, DashboardError> {
        dash.dispatch(Command::SaveScenario { name: name.into() })
    }

    #[test]
    fn edits_need_a_configuration() {
        let mut dash = Dashboard::new();
        let err = dash
            .dispatch(Command::SetGrowth {
                rate: GrowthRate::Gdp,
                value: 0.02,
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoConfiguration);
        assert_eq!(dash.begin_run(5).unwrap_err().kind(), ErrorKind::NoConfiguration);
        assert!(!dash.is_running());
    }

    #[test]
    fn percent_edit_lands_as_fraction() {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        dash.dispatch(Command::SetGrowthPercent {
            rate: GrowthRate::Population,
            percent: Decimal::new(25, 1),
        })
        .unwrap();
        let store = dash.config().unwrap();
        assert!((store.edited().scenarios.growth_pop - 0.025).abs() < 1e-12);
        assert!(store.is_dirty());
        dash.dispatch(Command::ResetConfig).unwrap();
        assert!(!dash.config().unwrap().is_dirty());
    }

    #[test]
    fn presets_come_from_the_catalog() {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        let mut catalog = ScenarioCatalog::new();
        catalog.insert(
            "fast".into(),
            CatalogEntry {
                name: "Fast".into(),
                description: String::new(),
                growth: GrowthPreset {
                    growth_gdp: Some(0.05),
                    ..GrowthPreset::default()
                },
            },
        );
        assert_eq!(dash.set_catalog(catalog), 1);
        dash.dispatch(Command::ApplyPreset { key: "fast".into() })
            .unwrap();
        assert_eq!(dash.config().unwrap().edited().scenarios.growth_gdp, 0.05);
        assert_eq!(dash.config().unwrap().edited().scenarios.growth_pop, 0.0115);

        let err = dash
            .dispatch(Command::ApplyPreset { key: "slow".into() })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownPreset);
    }

    #[test]
    fn save_without_result_is_rejected() {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        let err = save(&mut dash, "Baseline").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoActiveResult);
        assert!(dash.scenarios().is_empty());
        assert_eq!(dash.export_csv().unwrap_err().kind(), ErrorKind::NoActiveResult);
        assert_eq!(dash.export_json().unwrap_err().kind(), ErrorKind::NoActiveResult);
    }

    #[test]
    fn successful_run_redraws_every_surface_in_single_mode() {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        let ticket = dash.begin_run(5).unwrap();
        assert!(dash.is_running());
        let redraws = dash.complete_run(ticket, Ok(run(5, 0.0115))).unwrap();
        assert!(!dash.is_running());
        assert_eq!(redraws.len(), MetricFamily::ALL.len());
        assert!(redraws.iter().all(|r| r.mode == ChartMode::Single));
        assert!(redraws.iter().all(|r| r.bundle.labels.len() == 6));
        assert_eq!(dash.active().unwrap().years, 5);
    }

    #[test]
    fn overlapping_runs_are_refused() {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        let ticket = dash.begin_run(5).unwrap();
        assert_eq!(dash.begin_run(5).unwrap_err().kind(), ErrorKind::RunPending);
        dash.complete_run(ticket, Ok(run(5, 0.0))).unwrap();
        assert!(dash.begin_run(3).is_ok());
    }

    #[test]
    fn foreign_ticket_is_stale() {
        let mut other = Dashboard::with_config(baseline()).unwrap();
        let ticket = other.begin_run(5).unwrap();
        let mut dash = simulated(2);
        let before = dash.active().cloned();
        let err = dash.complete_run(ticket, Ok(run(5, 0.0))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleRun);
        assert_eq!(dash.active().cloned(), before);
    }

    #[test]
    fn ticket_with_same_generation_from_another_dashboard_is_stale() {
        let mut other = Dashboard::with_config(baseline()).unwrap();
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        let foreign = other.begin_run(5).unwrap();
        let own = dash.begin_run(5).unwrap();
        let err = dash.complete_run(foreign, Ok(run(5, 0.3))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleRun);
        assert!(dash.active().is_none());
        assert!(dash.is_running());
        dash.complete_run(own, Ok(run(5, 0.0))).unwrap();
        assert_eq!(dash.active().unwrap().results.len(), 6);
    }

    #[test]
    fn abandoned_run_frees_the_dashboard() {
        let mut dash = simulated(2);
        let before = dash.active().cloned();
        let ticket = dash.begin_run(5).unwrap();
        dash.abandon_run(ticket).unwrap();
        assert!(!dash.is_running());
        assert_eq!(dash.active().cloned(), before);
        let ticket = dash.begin_run(4).unwrap();
        dash.complete_run(ticket, Ok(run(4, 0.0))).unwrap();
        assert_eq!(dash.active().unwrap().years, 4);
    }

    #[test]
    fn abandoning_a_foreign_ticket_changes_nothing() {
        let mut other = Dashboard::with_config(baseline()).unwrap();
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        let foreign = other.begin_run(5).unwrap();
        let _own = dash.begin_run(5).unwrap();
        let err = dash.abandon_run(foreign).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleRun);
        assert!(dash.is_running());
    }

    #[test]
    fn zero_years_never_starts_a_run() {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        assert_eq!(dash.begin_run(0).unwrap_err().kind(), ErrorKind::SimulationFailed);
        assert!(!dash.is_running());
    }

    #[test]
    fn failed_run_keeps_previous_result() {
        let mut dash = simulated(3);
        let before = dash.active().cloned();
        let ticket = dash.begin_run(5).unwrap();
        let err = dash
            .complete_run(ticket, Err(GatewayError::SimulationFailed("diverged".into())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SimulationFailed);
        assert!(err.to_string().contains("diverged"));
        assert_eq!(dash.active().cloned(), before);
        assert!(!dash.is_running());
    }

    #[test]
    fn saved_scenario_keeps_the_submitted_config() {
        let mut dash = simulated(3);
        dash.dispatch(Command::SetGrowth {
            rate: GrowthRate::Population,
            value: 0.05,
        })
        .unwrap();
        let redraws = save(&mut dash, "Baseline").unwrap();
        assert!(redraws.iter().all(|r| r.mode == ChartMode::Comparison));
        let saved = dash.scenarios().get(0).unwrap();
        assert_eq!(saved.config().scenarios.growth_pop, 0.0115);
    }

    #[test]
    fn blank_name_is_rejected_without_mutation() {
        let mut dash = simulated(3);
        save(&mut dash, "A").unwrap();
        let err = save(&mut dash, "   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidScenario);
        assert_eq!(dash.scenarios().len(), 1);
    }

    #[test]
    fn removal_falls_back_to_single_mode() {
        let mut dash = simulated(3);
        save(&mut dash, "A").unwrap();
        save(&mut dash, "B").unwrap();
        let redraws = dash
            .dispatch(Command::RemoveScenario { index: 0 })
            .unwrap();
        assert!(redraws.iter().all(|r| r.mode == ChartMode::Comparison));
        assert_eq!(redraws[0].bundle.series.len(), 1);

        let redraws = dash
            .dispatch(Command::RemoveScenario { index: 0 })
            .unwrap();
        assert_eq!(redraws.len(), MetricFamily::ALL.len());
        assert!(redraws.iter().all(|r| r.mode == ChartMode::Single));

        let err = dash
            .dispatch(Command::RemoveScenario { index: 0 })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn clear_without_result_redraws_nothing() {
        let mut dash = Dashboard::with_config(baseline()).unwrap();
        assert!(dash.dispatch(Command::ClearScenarios).unwrap().is_empty());
        assert!(dash.current_view().unwrap().is_empty());
    }

    #[test]
    fn exports_read_the_active_result() {
        let dash = simulated(2);
        let csv = String::from_utf8(dash.export_csv().unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 4);
        let json: serde_json::Value = serde_json::from_str(&dash.export_json().unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 3);
    }
}
