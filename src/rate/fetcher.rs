use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use super::client::RateSource;
use super::error::RateError;
use super::key_path::KeyPath;

/// Client certificate settings for the upstream connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlsIdentity {
    /// PEM certificate chain.
    pub cert_path: PathBuf,
    /// PKCS#8 PEM private key.
    pub key_path: PathBuf,
    /// Extra root certificate (PEM) to trust.
    #[serde(default)]
    pub ca_path: Option<PathBuf>,
}

/// Where and how to fetch the upstream rate document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateFetcherConfig {
    pub url: String,
    pub key_path: KeyPath,
    /// Sent with every request. Empty by default.
    pub headers: BTreeMap<String, String>,
    /// Presented to the upstream when set. Unset by default.
    pub tls: Option<TlsIdentity>,
    pub timeout_ms: Option<u64>,
}

impl Default for RateFetcherConfig {
    fn default() -> Self {
        RateFetcherConfig {
            url: "https://api.exchangeratesapi.io/latest?base=USD".into(),
            key_path: KeyPath::keys(["rates", "EUR"]),
            headers: BTreeMap::new(),
            tls: None,
            timeout_ms: None,
        }
    }
}

/// One-shot upstream client: GET, parse JSON, pick one scalar.
pub struct RateFetcher {
    client: Client,
    url: String,
    key_path: KeyPath,
}

impl RateFetcher {
    pub fn new(config: &RateFetcherConfig) -> Result<Self, RateError> {
        let mut builder = Client::builder();

        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if !config.headers.is_empty() {
            builder = builder.default_headers(header_map(&config.headers)?);
        }
        if let Some(tls) = &config.tls {
            builder = with_identity(builder, tls)?;
        }

        let client = builder
            .build()
            .map_err(|e| RateError::Client(e.to_string()))?;

        Ok(RateFetcher {
            client,
            url: config.url.clone(),
            key_path: config.key_path.clone(),
        })
    }

    /// Fetch the document and return the value at the key path as text.
    pub fn fetch_text(&self) -> Result<String, RateError> {
        debug!("GET {}", self.url);
        let resp = self.client.get(&self.url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body = resp.text()?;
        let document: serde_json::Value = serde_json::from_str(&body)?;
        let text = self.key_path.scalar_text(&document)?;
        debug!("{} = {text}", self.key_path);
        Ok(text)
    }
}

impl RateSource for RateFetcher {
    fn fetch_rate(&self) -> Result<f64, RateError> {
        let text = self.fetch_text()?;
        text.trim()
            .parse::<f64>()
            .map_err(|_| RateError::Parse(text.clone()))
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, RateError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RateError::Header(format!("name '{name}'")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| RateError::Header(format!("value for '{name}'")))?;
        map.insert(header, value);
    }
    Ok(map)
}

fn with_identity(
    builder: reqwest::blocking::ClientBuilder,
    tls: &TlsIdentity,
) -> Result<reqwest::blocking::ClientBuilder, RateError> {
    let read = |path: &PathBuf| {
        std::fs::read(path).map_err(|e| RateError::Tls(format!("{}: {e}", path.display())))
    };

    let cert = read(&tls.cert_path)?;
    let key = read(&tls.key_path)?;
    let identity = reqwest::Identity::from_pkcs8_pem(&cert, &key)
        .map_err(|e| RateError::Tls(e.to_string()))?;
    let mut builder = builder.identity(identity);

    if let Some(ca_path) = &tls.ca_path {
        let ca = reqwest::Certificate::from_pem(&read(ca_path)?)
            .map_err(|e| RateError::Tls(e.to_string()))?;
        builder = builder.add_root_certificate(ca);
    }
    Ok(builder)
}
