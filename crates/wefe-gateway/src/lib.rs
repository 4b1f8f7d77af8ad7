#![deny(warnings)]

//! Boundary to the external simulation engine and configuration sources.
//!
//! The dashboard only talks to the outside world through the three traits
//! defined here. [`HttpEngine`] implements all of them against the engine's
//! JSON API; [`FileConfigSource`] and [`EmbeddedCatalog`] cover offline use.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use wefe_core::{
    validate_configuration, Configuration, GrowthScenario, ResultTable, ScenarioCatalog,
    SimulationRun, Summary,
};

/// Errors surfaced by engine and source calls. Never retried here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    /// Config source unreachable or the payload is unusable.
    #[error("configuration load failed: {0}")]
    ConfigLoadFailed(String),
    /// Engine rejected the input, failed, or could not be reached.
    #[error("simulation failed: {0}")]
    SimulationFailed(String),
    /// Preset catalog unreachable or malformed.
    #[error("scenario catalog load failed: {0}")]
    CatalogLoadFailed(String),
}

/// Runs the opaque simulation model. Stateless per call.
#[async_trait]
pub trait SimulationGateway: Send + Sync {
    async fn run(&self, config: &Configuration, years: u32) -> Result<SimulationRun, GatewayError>;
}

/// Supplies the baseline configuration.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<Configuration, GatewayError>;
}

/// Supplies growth presets used to pre-fill the configuration.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn catalog(&self) -> Result<ScenarioCatalog, GatewayError>;
}

#[derive(Serialize)]
struct SimulateRequest<'a> {
    initial_data: &'a Map<String, Value>,
    params: &'a Map<String, Value>,
    scenarios: &'a GrowthScenario,
    years: u32,
}

#[derive(Deserialize)]
struct SimulateEnvelope {
    success: bool,
    results: Option<ResultTable>,
    summary: Option<Summary>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ConfigEnvelope {
    success: bool,
    config: Option<Configuration>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct CatalogEnvelope {
    success: bool,
    scenarios: Option<ScenarioCatalog>,
    error: Option<String>,
}

/// Send a request and decode the JSON envelope, whatever the status code.
/// Error bodies from the engine still carry a useful `error` field.
async fn exchange<T: DeserializeOwned>(request: RequestBuilder) -> Result<(StatusCode, T), String> {
    let response = request
        .send()
        .await
        .map_err(|e| format!("transport error: {e}"))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("transport error: {e}"))?;
    match serde_json::from_str::<T>(&body) {
        Ok(envelope) => Ok((status, envelope)),
        Err(e) if status.is_success() => Err(format!("malformed engine response: {e}")),
        Err(_) => Err(format!("engine returned HTTP {status}")),
    }
}

fn failure_reason(status: StatusCode, error: Option<String>) -> String {
    error.unwrap_or_else(|| format!("engine returned HTTP {status}"))
}

/// JSON-over-HTTP client for the engine service.
#[derive(Clone, Debug)]
pub struct HttpEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEngine {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl SimulationGateway for HttpEngine {
    async fn run(&self, config: &Configuration, years: u32) -> Result<SimulationRun, GatewayError> {
        if years == 0 {
            return Err(GatewayError::SimulationFailed(
                "simulation horizon must be at least one year".into(),
            ));
        }
        let body = SimulateRequest {
            initial_data: &config.initial_data,
            params: &config.params,
            scenarios: &config.scenarios,
            years,
        };
        debug!(years, url = %self.endpoint("simulate"), "submitting simulation");
        let (status, envelope): (_, SimulateEnvelope) =
            exchange(self.client.post(self.endpoint("simulate")).json(&body))
                .await
                .map_err(GatewayError::SimulationFailed)?;
        if !status.is_success() || !envelope.success {
            let reason = failure_reason(status, envelope.error);
            debug!(%status, %reason, "engine rejected simulation");
            return Err(GatewayError::SimulationFailed(reason));
        }
        match (envelope.results, envelope.summary) {
            (Some(results), Some(summary)) => {
                info!(years, rows = results.len(), "simulation completed");
                Ok(SimulationRun { results, summary })
            }
            _ => Err(GatewayError::SimulationFailed(
                "engine response is missing results or summary".into(),
            )),
        }
    }
}

#[async_trait]
impl ConfigSource for HttpEngine {
    async fn load(&self) -> Result<Configuration, GatewayError> {
        let (status, envelope): (_, ConfigEnvelope) =
            exchange(self.client.get(self.endpoint("config")))
                .await
                .map_err(GatewayError::ConfigLoadFailed)?;
        if !status.is_success() || !envelope.success {
            return Err(GatewayError::ConfigLoadFailed(failure_reason(status, envelope.error)));
        }
        let config = envelope.config.ok_or_else(|| {
            GatewayError::ConfigLoadFailed("engine response carries no configuration".into())
        })?;
        validate_configuration(&config).map_err(|e| GatewayError::ConfigLoadFailed(e.to_string()))?;
        info!(url = %self.base_url, "baseline configuration loaded");
        Ok(config)
    }
}

#[async_trait]
impl CatalogSource for HttpEngine {
    async fn catalog(&self) -> Result<ScenarioCatalog, GatewayError> {
        let (status, envelope): (_, CatalogEnvelope) =
            exchange(self.client.get(self.endpoint("scenarios")))
                .await
                .map_err(GatewayError::CatalogLoadFailed)?;
        if !status.is_success() || !envelope.success {
            return Err(GatewayError::CatalogLoadFailed(failure_reason(status, envelope.error)));
        }
        Ok(envelope.scenarios.unwrap_or_default())
    }
}

/// Baseline configuration read from a local JSON file.
#[derive(Clone, Debug)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load(&self) -> Result<Configuration, GatewayError> {
        let fail = |e: String| GatewayError::ConfigLoadFailed(format!("{}: {e}", self.path.display()));
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| fail(e.to_string()))?;
        let config: Configuration = serde_json::from_str(&text).map_err(|e| fail(e.to_string()))?;
        validate_configuration(&config).map_err(|e| fail(e.to_string()))?;
        info!(path = %self.path.display(), "baseline configuration loaded");
        Ok(config)
    }
}

const EMBEDDED_CATALOG: &str = include_str!("../assets/catalog.yaml");

/// Parse the preset catalog shipped with the dashboard.
pub fn embedded_catalog() -> Result<ScenarioCatalog, GatewayError> {
    serde_yaml::from_str(EMBEDDED_CATALOG).map_err(|e| GatewayError::CatalogLoadFailed(e.to_string()))
}

/// Catalog source backed by [`embedded_catalog`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedCatalog;

#[async_trait]
impl CatalogSource for EmbeddedCatalog {
    async fn catalog(&self) -> Result<ScenarioCatalog, GatewayError> {
        embedded_catalog()
    }
}
