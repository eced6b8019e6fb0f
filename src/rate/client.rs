use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use super::error::RateError;

/// Anything that can produce the current exchange rate.
pub trait RateSource {
    fn fetch_rate(&self) -> Result<f64, RateError>;
}

impl<F> RateSource for F
where
    F: Fn() -> Result<f64, RateError>,
{
    fn fetch_rate(&self) -> Result<f64, RateError> {
        self()
    }
}

/// Client for the rate service: `GET <url>` answering a bare number.
pub struct RateServiceClient {
    client: Client,
    url: String,
}

impl RateServiceClient {
    /// `timeout` bounds the whole request, connect included.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RateError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| RateError::Client(e.to_string()))?;

        Ok(RateServiceClient {
            client,
            url: url.into(),
        })
    }
}

impl RateSource for RateServiceClient {
    fn fetch_rate(&self) -> Result<f64, RateError> {
        debug!("GET {}", self.url);
        let resp = self.client.get(&self.url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body = resp.text()?;
        body.trim()
            .parse::<f64>()
            .map_err(|_| RateError::Parse(body.trim().to_string()))
    }
}
