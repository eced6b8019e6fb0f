//! The end-to-end run: load → filter → select → convert → export → stats → chart.

use log::{info, warn};
use thiserror::Error;

use crate::chart::{render_line_chart, ChartError};
use crate::config::EtlConfig;
use crate::data::export::export;
use crate::data::filter::{filter_last_n_days, select_columns};
use crate::data::loader::load;
use crate::data::stats::{column_sum, StatTable};
use crate::data::transform::convert;
use crate::data::{LoadError, PipelineError};
use crate::rate::{RateError, RateSource};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("loading input: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("fetching exchange rate: {0}")]
    Rate(#[from] RateError),

    #[error("rendering chart: {0}")]
    Chart(#[from] ChartError),
}

/// Where the rate used for conversion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateOutcome {
    pub rate: f64,
    pub origin: RateOrigin,
}

/// Ask `source` for the rate; on a transient failure use `default_rate`.
/// Any other failure is returned.
pub fn resolve_rate(source: &dyn RateSource, default_rate: f64) -> Result<RateOutcome, RateError> {
    match source.fetch_rate() {
        Ok(rate) => {
            info!("Got the actual currency exchange rate from remote service: {rate}");
            Ok(RateOutcome {
                rate,
                origin: RateOrigin::Live,
            })
        }
        Err(e) if e.is_transient() => {
            warn!("Currency exchange rate set to default {default_rate} ({e})");
            Ok(RateOutcome {
                rate: default_rate,
                origin: RateOrigin::Fallback,
            })
        }
        Err(e) => Err(e),
    }
}

/// What a completed run produced besides its files.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rate: RateOutcome,
    pub rows: usize,
    /// `(column, total)` when a sum column is configured.
    pub sum: Option<(String, f64)>,
    pub stats: StatTable,
}

pub fn run(config: &EtlConfig, rates: &dyn RateSource) -> Result<RunReport, RunError> {
    let mut dataset = load(&config.input_path, &config.date_column, &config.date_format)?;

    filter_last_n_days(&mut dataset, config.days_range)?;
    select_columns(&mut dataset, &config.required_columns);
    info!(
        "Kept {} rows of the last {} days, columns {:?}",
        dataset.len(),
        config.days_range,
        dataset.column_names
    );

    let rate = resolve_rate(rates, config.default_rate)?;
    convert(&mut dataset, &config.conversions, rate.rate)?;
    export(&dataset, &config.output_path)?;

    let sum = match &config.sum_column {
        Some(col) => Some((col.clone(), column_sum(&dataset, col)?)),
        None => None,
    };

    let stats = StatTable::build(&dataset, &config.stats)?;

    render_line_chart(&dataset, &config.chart, &config.chart_path)?;

    Ok(RunReport {
        rate,
        rows: dataset.len(),
        sum,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_rate_is_used() {
        let live = || -> Result<f64, RateError> { Ok(0.91) };
        let outcome = resolve_rate(&live, 0.87).unwrap();
        assert_eq!(outcome, RateOutcome { rate: 0.91, origin: RateOrigin::Live });
    }

    #[test]
    fn timeout_and_connection_fall_back() {
        let timeout = || -> Result<f64, RateError> { Err(RateError::Timeout("3s".into())) };
        let refused = || -> Result<f64, RateError> { Err(RateError::Connection("refused".into())) };

        for source in [&timeout as &dyn RateSource, &refused] {
            let outcome = resolve_rate(source, 0.87).unwrap();
            assert_eq!(outcome.rate, 0.87);
            assert_eq!(outcome.origin, RateOrigin::Fallback);
        }
    }

    #[test]
    fn service_hanging_up_falls_back() {
        let client = crate::rate::RateServiceClient::new(
            format!("http://{}/", crate::testing::hang_up_addr()),
            std::time::Duration::from_millis(300),
        )
        .unwrap();
        let outcome = resolve_rate(&client, 0.87).unwrap();
        assert_eq!(outcome.origin, RateOrigin::Fallback);
    }

    #[test]
    fn other_rate_errors_are_fatal() {
        let garbage = || -> Result<f64, RateError> { Err(RateError::Parse("n/a".into())) };
        assert!(matches!(resolve_rate(&garbage, 0.87), Err(RateError::Parse(_))));
    }
}
