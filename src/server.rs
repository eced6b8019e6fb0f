//! The rate service: one route, `GET /`, answering the upstream rate as text.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::rate::{RateError, RateFetcher, RateFetcherConfig};

/// Settings for the `rate-service` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateServiceConfig {
    pub bind_addr: SocketAddr,
    pub upstream: RateFetcherConfig,
}

impl Default for RateServiceConfig {
    fn default() -> Self {
        RateServiceConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            upstream: RateFetcherConfig::default(),
        }
    }
}

#[derive(Clone)]
struct ServiceState {
    upstream: Arc<RateFetcherConfig>,
}

/// Upstream failures surface as `500` with the error text as body.
#[derive(Debug)]
enum ServiceError {
    Upstream(RateError),
    Task(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let message = match self {
            ServiceError::Upstream(e) => e.to_string(),
            ServiceError::Task(e) => format!("fetch task failed: {e}"),
        };
        error!("GET / failed: {message}");
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

pub fn router(upstream: RateFetcherConfig) -> Router {
    Router::new()
        .route("/", get(current_rate))
        .with_state(ServiceState {
            upstream: Arc::new(upstream),
        })
}

async fn current_rate(State(state): State<ServiceState>) -> Result<String, ServiceError> {
    let config = state.upstream.clone();

    // A fresh blocking client per request, built and dropped off the async workers.
    let text = tokio::task::spawn_blocking(move || RateFetcher::new(&config)?.fetch_text())
        .await
        .map_err(|e| ServiceError::Task(e.to_string()))?
        .map_err(ServiceError::Upstream)?;

    info!("GET / -> {text}");
    Ok(text)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: RateServiceConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    info!(
        "Rate service listening on http://{} (upstream {}, key path {})",
        config.bind_addr, config.upstream.url, config.upstream.key_path
    );
    axum::serve(listener, router(config.upstream))
        .await
        .context("serving HTTP")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{refused_addr, serve_in_background};
    use axum::Json;
    use serde_json::json;

    fn upstream_at(url: String) -> RateFetcherConfig {
        RateFetcherConfig {
            url,
            timeout_ms: Some(2_000),
            ..RateFetcherConfig::default()
        }
    }

    #[test]
    fn serves_upstream_rate_as_plain_text() {
        let upstream = serve_in_background(Router::new().route(
            "/latest",
            get(|| async { Json(json!({"base": "USD", "rates": {"EUR": 0.8732}})) }),
        ));
        let service = serve_in_background(router(upstream_at(format!("http://{upstream}/latest"))));

        let resp = reqwest::blocking::get(format!("http://{service}/")).unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"), "{content_type}");
        assert_eq!(resp.text().unwrap(), "0.8732");
    }

    #[test]
    fn upstream_failure_is_a_server_error() {
        let service =
            serve_in_background(router(upstream_at(format!("http://{}/", refused_addr()))));

        let resp = reqwest::blocking::get(format!("http://{service}/")).unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.text().unwrap().contains("connection failed"));
    }

    #[test]
    fn only_root_is_routed() {
        let service = serve_in_background(router(RateFetcherConfig::default()));
        let resp = reqwest::blocking::get(format!("http://{service}/rates")).unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: RateServiceConfig =
            serde_json::from_str(r#"{"upstream": {"key_path": ["rates", "GBP"]}}"#).unwrap();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.upstream.key_path.to_string(), "rates.GBP");
        assert!(config.upstream.url.contains("base=USD"));
    }
}
