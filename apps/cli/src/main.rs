#![deny(warnings)]

//! Headless dashboard: load a baseline, run the engine, compare presets and
//! print the summary and charts.

use anyhow::{bail, Result};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wefe_charts::MetricFamily;
use wefe_core::{GrowthRate, Summary};
use wefe_gateway::{EmbeddedCatalog, FileConfigSource, HttpEngine};
use wefe_runtime::{sketch, ChartBoard, Command, Dashboard};

#[derive(Parser, Debug)]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")"),
    about = "WEFE nexus scenario dashboard",
    long_about = None
)]
struct Cli {
    /// Base URL of the simulation engine.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    engine_url: String,
    /// Read the baseline from a JSON file instead of the engine.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulation horizon in years.
    #[arg(long, default_value_t = 30)]
    years: u32,
    /// Catalog preset applied before the first run.
    #[arg(long)]
    preset: Option<String>,
    /// Population growth, percent per year.
    #[arg(long)]
    growth_pop: Option<Decimal>,
    /// GDP growth, percent per year.
    #[arg(long)]
    growth_gdp: Option<Decimal>,
    /// Urbanization growth, percent per year.
    #[arg(long)]
    growth_urbanization: Option<Decimal>,
    /// Agricultural yield growth, percent per year.
    #[arg(long)]
    growth_agri_yield: Option<Decimal>,
    /// Also run a catalog preset and compare it, as NAME=PRESET. Repeatable.
    #[arg(long = "compare", value_parser = parse_compare)]
    compare: Vec<(String, String)>,
    /// Write the active result as CSV.
    #[arg(long)]
    export_csv: Option<PathBuf>,
    /// Write the active result as JSON.
    #[arg(long)]
    export_json: Option<PathBuf>,
}

impl Cli {
    fn growth_edits(&self) -> Vec<Command> {
        [
            (GrowthRate::Population, self.growth_pop),
            (GrowthRate::Gdp, self.growth_gdp),
            (GrowthRate::Urbanization, self.growth_urbanization),
            (GrowthRate::AgriYield, self.growth_agri_yield),
        ]
        .into_iter()
        .filter_map(|(rate, percent)| percent.map(|percent| Command::SetGrowthPercent { rate, percent }))
        .collect()
    }
}

fn parse_compare(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, preset)) if !name.trim().is_empty() && !preset.is_empty() => {
            Ok((name.trim().to_string(), preset.to_string()))
        }
        _ => Err(format!("expected NAME=PRESET, got `{raw}`")),
    }
}

/// Rounded integer with thousands separators: `12345.6` becomes `12,346`.
fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

fn print_summary(summary: &Summary) {
    println!(
        "Horizon | {} years | {}..{}",
        summary.total_years, summary.start_year, summary.end_year
    );
    println!(
        "Final ratios | water: {:.2} | food: {:.2} | energy: {:.2}",
        summary.final_water_ratio, summary.final_food_ratio, summary.final_energy_ratio
    );
    if let (Some(demand), Some(supply)) = (summary.final_energy_demand, summary.final_energy_supply) {
        println!("Energy | demand: {} | supply: {}", grouped(demand), grouped(supply));
    }
    println!(
        "Ecology | total CO2: {} Mt | avg water stress: {:.2}",
        grouped(summary.total_co2_emissions),
        summary.avg_water_stress
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    if cli.years == 0 {
        bail!("--years must be at least 1");
    }
    let engine = HttpEngine::new(cli.engine_url.as_str());
    info!(engine = engine.base_url(), years = cli.years, "starting dashboard");
    let mut dash = Dashboard::new();
    match &cli.config {
        Some(path) => dash.load_config(&FileConfigSource::new(path)).await?,
        None => dash.load_config(&engine).await?,
    }
    if let Err(err) = dash.load_catalog(&engine).await {
        warn!(error = %err, "engine catalog unavailable; using built-in presets");
        dash.load_catalog(&EmbeddedCatalog).await?;
    }

    if let Some(key) = &cli.preset {
        dash.dispatch(Command::ApplyPreset { key: key.clone() })?;
    }
    for edit in cli.growth_edits() {
        dash.dispatch(edit)?;
    }

    let mut board = ChartBoard::new();
    board.apply(dash.run_simulation(&engine, cli.years).await?);
    if let Some(active) = dash.active() {
        print_summary(&active.summary);
    }

    if !cli.compare.is_empty() {
        dash.dispatch(Command::SaveScenario {
            name: cli.preset.clone().unwrap_or_else(|| "Baseline".to_string()),
        })?;
        for (name, preset) in &cli.compare {
            dash.dispatch(Command::ResetConfig)?;
            dash.dispatch(Command::ApplyPreset { key: preset.clone() })?;
            dash.run_simulation(&engine, cli.years).await?;
            board.apply(dash.dispatch(Command::SaveScenario { name: name.clone() })?);
        }
        info!(scenarios = dash.scenarios().len(), "comparison ready");
    }

    for family in MetricFamily::ALL {
        if let Some(chart) = board.current(family) {
            print!("{}", sketch(&chart.bundle));
        }
    }

    if let Some(path) = &cli.export_csv {
        tokio::fs::write(path, dash.export_csv()?).await?;
        info!(path = %path.display(), "csv written");
    }
    if let Some(path) = &cli.export_json {
        tokio::fs::write(path, dash.export_json()?).await?;
        info!(path = %path.display(), "json written");
    }
    if cli.export_csv.is_none() && cli.export_json.is_none() {
        info!(
            csv = export::CSV_FILE_NAME,
            json = export::JSON_FILE_NAME,
            "pass --export-csv/--export-json to save the active result"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_rounds_and_separates_thousands() {
        assert_eq!(grouped(0.4), "0");
        assert_eq!(grouped(999.5), "1,000");
        assert_eq!(grouped(1234567.0), "1,234,567");
        assert_eq!(grouped(-45210.2), "-45,210");
    }

    #[test]
    fn compare_flag_needs_name_and_preset() {
        assert_eq!(
            parse_compare("Fast=accelerated_growth").unwrap(),
            ("Fast".to_string(), "accelerated_growth".to_string())
        );
        assert!(parse_compare("accelerated_growth").is_err());
        assert!(parse_compare("=x").is_err());
        assert!(parse_compare("Fast=").is_err());
    }

    #[test]
    fn growth_flags_become_percent_edits() {
        let cli = Cli::parse_from(["wefe", "--growth-gdp", "3.2", "--compare", "A=base_2005"]);
        assert_eq!(
            cli.growth_edits(),
            vec![Command::SetGrowthPercent {
                rate: GrowthRate::Gdp,
                percent: Decimal::new(32, 1)
            }]
        );
        assert_eq!(cli.compare.len(), 1);
        assert_eq!(cli.years, 30);
    }
}
