use std::path::Path;

use btc_etl::config::EtlConfig;
pub use btc_etl::testing::serve_in_background;

/// Default settings with every path moved under `dir`.
pub fn config_in(dir: &Path) -> EtlConfig {
    EtlConfig {
        input_path: dir.join("input").join("btc-1.csv"),
        output_path: dir.join("output").join("btc-last-year.csv"),
        chart_path: dir.join("output").join("prices_of_BTC_past_year.png"),
        fetch_timeout_ms: 300,
        ..EtlConfig::default()
    }
}
