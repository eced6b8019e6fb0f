use std::path::Path;

use anyhow::Result;
use btc_etl::config::{load_or_default, RATE_SERVICE_CONFIG_FILE};
use btc_etl::server::{self, RateServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config: RateServiceConfig = load_or_default(Path::new(RATE_SERVICE_CONFIG_FILE))?;
    server::serve(config).await
}
