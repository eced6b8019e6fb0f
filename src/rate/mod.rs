//! Exchange-rate retrieval.
//!
//! [`RateFetcher`] talks to the third-party JSON API and is what the rate
//! service serves; [`RateServiceClient`] is what the pipeline uses to ask
//! that service. Both report failures as [`RateError`], whose
//! [`is_transient`](RateError::is_transient) decides whether a fallback
//! rate may be used.

pub mod client;
pub mod error;
pub mod fetcher;
pub mod key_path;

pub use client::{RateServiceClient, RateSource};
pub use error::RateError;
pub use fetcher::{RateFetcher, RateFetcherConfig, TlsIdentity};
pub use key_path::{KeyPath, Segment};
