//! Run settings. Defaults reproduce the sample BTC configuration; a JSON
//! file may override any subset of fields.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;
use crate::data::stats::StatRequest;
use crate::data::transform::ConversionRule;

/// File looked up in the working directory by the `btc-etl` binary.
pub const ETL_CONFIG_FILE: &str = "btc-etl.json";
/// File looked up in the working directory by the `rate-service` binary.
pub const RATE_SERVICE_CONFIG_FILE: &str = "rate-service.json";

pub const COL_DATE: &str = "date";
pub const COL_MARKET_CAP_USD: &str = "marketcap(USD)";
pub const COL_PRICE_USD: &str = "price(USD)";
pub const COL_GEN_COINS: &str = "generatedCoins";
pub const COL_PAYMENT_COUNT: &str = "paymentCount";
pub const COL_MARKET_CAP_EUR: &str = "marketcap(EUR)";
pub const COL_PRICE_EUR: &str = "price(EUR)";

/// Everything the pipeline run needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtlConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub chart_path: PathBuf,

    pub date_column: String,
    /// strftime pattern, e.g. `%Y-%m-%d`.
    pub date_format: String,

    /// Columns kept after the day filter.
    pub required_columns: BTreeSet<String>,
    pub conversions: Vec<ConversionRule>,
    /// Summary rows, printed in this order.
    pub stats: Vec<StatRequest>,
    /// Column whose total is reported, if any.
    pub sum_column: Option<String>,

    pub days_range: u32,

    pub default_rate: f64,
    pub rate_service_url: String,
    pub fetch_timeout_ms: u64,

    pub chart: ChartSpec,
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            input_path: PathBuf::from("input/btc-1.csv"),
            output_path: PathBuf::from("output/btc-last-year.csv"),
            chart_path: PathBuf::from("output/prices_of_BTC_past_year.png"),
            date_column: COL_DATE.into(),
            date_format: "%Y-%m-%d".into(),
            required_columns: [
                COL_DATE,
                COL_MARKET_CAP_USD,
                COL_PRICE_USD,
                COL_GEN_COINS,
                COL_PAYMENT_COUNT,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            conversions: vec![
                ConversionRule::new(COL_MARKET_CAP_EUR, COL_MARKET_CAP_USD),
                ConversionRule::new(COL_PRICE_EUR, COL_PRICE_USD),
            ],
            // Market cap in billions of EUR.
            stats: vec![
                StatRequest::new(COL_MARKET_CAP_EUR, Some(1_000_000_000.0)),
                StatRequest::new(COL_PRICE_EUR, None),
                StatRequest::new(COL_GEN_COINS, None),
                StatRequest::new(COL_PAYMENT_COUNT, None),
            ],
            sum_column: Some(COL_GEN_COINS.into()),
            days_range: 365,
            default_rate: 0.87,
            rate_service_url: "http://exc_rate_getter:5000/".into(),
            fetch_timeout_ms: 3_000,
            chart: ChartSpec::default(),
        }
    }
}

impl EtlConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Read `path` as JSON if it exists, otherwise fall back to `T::default()`.
pub fn load_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
