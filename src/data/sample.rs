//! Synthetic daily BTC table with the same columns as the real export, for
//! demos and tests.

use chrono::{Duration, NaiveDate};

use super::model::{Dataset, Row, Value};

pub const SAMPLE_COLUMNS: [&str; 9] = [
    "date",
    "txCount",
    "marketcap(USD)",
    "price(USD)",
    "exchangeVolume(USD)",
    "generatedCoins",
    "fees",
    "activeAddresses",
    "paymentCount",
];

/// SplitMix64: one `u64` of state, good enough for reproducible demo data.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        // 1 - unit() lies in (0, 1], so the log is finite.
        let radius = (-2.0 * (1.0 - self.unit()).ln()).sqrt();
        let angle = std::f64::consts::TAU * self.unit();
        mean + std_dev * radius * angle.cos()
    }
}

/// `days` consecutive daily rows ending at `last_day`, oldest first.
///
/// Price follows a geometric random walk from `start_price`; market cap is
/// price × circulating supply, which grows by each day's generated coins.
pub fn generate(days: u32, last_day: NaiveDate, start_price: f64, seed: u64) -> Dataset {
    let mut rng = SplitMix(seed);
    let first_day = last_day - Duration::days(i64::from(days) - 1);

    let mut price = start_price;
    let mut supply = 17_000_000.0_f64;
    let mut rows = Vec::with_capacity(days as usize);

    for i in 0..days {
        let day = first_day + Duration::days(i64::from(i));
        price = (price * (1.0 + rng.normal(0.0005, 0.035))).max(1.0);

        let generated = (rng.normal(1800.0, 120.0)).max(0.0).round();
        supply += generated;

        let tx_count = rng.normal(280_000.0, 30_000.0).max(0.0).round() as i64;
        let payments = (tx_count as f64 * rng.normal(1.6, 0.1)).round() as i64;

        let mut row = Row::new();
        row.insert("date".into(), Value::Date(day));
        row.insert("txCount".into(), Value::Integer(tx_count));
        row.insert("marketcap(USD)".into(), Value::Float((price * supply).round()));
        row.insert("price(USD)".into(), Value::Float((price * 100.0).round() / 100.0));
        row.insert(
            "exchangeVolume(USD)".into(),
            Value::Float((price * rng.normal(900_000.0, 150_000.0).abs()).round()),
        );
        row.insert("generatedCoins".into(), Value::Float(generated));
        row.insert("fees".into(), Value::Float((rng.unit() * 80.0 * 1e4).round() / 1e4));
        row.insert(
            "activeAddresses".into(),
            Value::Integer(rng.normal(700_000.0, 60_000.0).max(0.0).round() as i64),
        );
        row.insert("paymentCount".into(), Value::Integer(payments));
        rows.push(row);
    }

    Dataset::new(
        SAMPLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
        "date",
        "%Y-%m-%d",
    )
}
