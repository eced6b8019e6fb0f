use std::path::Path;

use anyhow::Result;
use btc_etl::config::{load_or_default, EtlConfig, ETL_CONFIG_FILE};
use btc_etl::pipeline;
use btc_etl::rate::RateServiceClient;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config: EtlConfig = load_or_default(Path::new(ETL_CONFIG_FILE))?;
    let rates = RateServiceClient::new(&config.rate_service_url, config.fetch_timeout())?;

    let report = pipeline::run(&config, &rates)?;

    if let Some((column, total)) = &report.sum {
        println!("Sum of {column}: {total}");
    }
    print!("{}", report.stats);
    Ok(())
}
