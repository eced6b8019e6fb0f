use std::path::Path;

use anyhow::{Context, Result};
use btc_etl::data::export::export;
use btc_etl::data::sample::generate;
use chrono::NaiveDate;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Two years of history so the 365-day window has something to cut.
    let last_day = NaiveDate::from_ymd_opt(2019, 10, 31).context("invalid end date")?;
    let dataset = generate(730, last_day, 4_000.0, 42);

    let output_path = Path::new("input/btc-1.csv");
    export(&dataset, output_path)?;

    println!(
        "Wrote {} days ({} columns) to {}",
        dataset.len(),
        dataset.column_names.len(),
        output_path.display()
    );
    Ok(())
}
