//! HTTP transport to the FAQ service.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use faq_core::{Credential, EndpointConfig, FaqError, Result};

use crate::rate::RateTracker;

const RATE_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RATE_RESET_HEADER: &str = "x-ratelimit-reset";

/// One GET against `{base}/{operation}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Operation name, appended to the base URL.
    pub operation: String,

    /// Query parameters in order. `None` values are never sent.
    pub params: Vec<(String, Option<String>)>,
}

impl ApiRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.params.push((name.into(), value.map(Into::into)));
        self
    }

    /// Parameters that carry a value, in order.
    pub fn present_params(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
            .collect()
    }

    /// `operation?a=1&b=2`, used to identify requests in logs and mocks.
    pub fn signature(&self) -> String {
        let params = self.present_params();
        if params.is_empty() {
            return self.operation.clone();
        }
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}?{}", self.operation, query.join("&"))
    }
}

/// Performs a single request and reports rate-limit headers.
///
/// Implementations must update `rate` for every response that reached the
/// service, successful or not. Caching is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &ApiRequest, rate: &RateTracker) -> Result<Value>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credential: Credential,
}

impl HttpTransport {
    /// Build a transport for the given endpoint.
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(endpoint.user_agent.clone())
            .build()
            .map_err(|e| FaqError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: endpoint.base_url.clone(),
            credential: endpoint.credential.clone(),
        })
    }

    fn url_for(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest, rate: &RateTracker) -> Result<Value> {
        let url = self.url_for(&request.operation);
        debug!("GET {} {:?}", url, request.present_params());

        let response = self
            .client
            .get(&url)
            .query(&request.present_params())
            .header(AUTHORIZATION, format!("Bearer {}", self.credential.expose()))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        record_rate_headers(response.headers(), rate);

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = rate.status().reset_at().unwrap_or_else(Utc::now);
            return Err(FaqError::RateLimited { reset_at });
        }

        let body = response.text().await.map_err(classify_reqwest_error)?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| status_text(status));
            return Err(FaqError::api(status.as_u16(), message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn record_rate_headers(headers: &HeaderMap, rate: &RateTracker) {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    rate.update_from_headers(header(RATE_REMAINING_HEADER), header(RATE_RESET_HEADER));
}

/// Connection-level failures become `Network`; anything else is unexpected.
fn classify_reqwest_error(err: reqwest::Error) -> FaqError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        debug!("Network failure: {}", err);
        FaqError::network()
    } else {
        FaqError::internal(format!("HTTP request failed: {}", err))
    }
}

/// Pull a human-readable message out of a JSON error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
