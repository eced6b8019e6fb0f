//! Bitcoin price ETL and the exchange-rate service it consults.
//!
//! * [`pipeline::run`] loads a daily BTC CSV, keeps the trailing day window
//!   and the required columns, converts USD columns to EUR at the live (or
//!   fallback) rate, exports the result, summarises it, and charts the price.
//! * [`server::router`] is the single-route HTTP service that fetches the
//!   live rate from a third-party JSON API.

pub mod chart;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod rate;
pub mod server;

#[doc(hidden)]
pub mod testing;
