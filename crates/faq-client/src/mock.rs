//! In-memory transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use faq_core::{FaqError, RateStatus, Result};

use crate::rate::RateTracker;
use crate::transport::{ApiRequest, Transport};

/// A scripted failure; `FaqError` itself is not `Clone`.
#[derive(Debug, Clone)]
enum MockFailure {
    Network,
    Api(u16, String),
    RateLimited,
}

impl MockFailure {
    fn to_error(&self) -> FaqError {
        match self {
            Self::Network => FaqError::network(),
            Self::Api(status, message) => FaqError::api(*status, message.clone()),
            Self::RateLimited => FaqError::RateLimited {
                reset_at: Utc::now(),
            },
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, std::result::Result<Value, MockFailure>>,
    requests: Vec<String>,
    rate: RateStatus,
}

/// Serves canned JSON keyed by request signature and records every call.
///
/// Unknown signatures answer 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `signature` (see [`ApiRequest::signature`]) with `body`.
    pub fn with_response(self, signature: impl Into<String>, body: Value) -> Self {
        self.set(signature.into(), Ok(body));
        self
    }

    /// Fail `signature` with a network error.
    pub fn with_network_error(self, signature: impl Into<String>) -> Self {
        self.set(signature.into(), Err(MockFailure::Network));
        self
    }

    /// Fail `signature` with an API error.
    pub fn with_api_error(
        self,
        signature: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        self.set(signature.into(), Err(MockFailure::Api(status, message.into())));
        self
    }

    /// Fail `signature` with HTTP 429.
    pub fn with_rate_limit(self, signature: impl Into<String>) -> Self {
        self.set(signature.into(), Err(MockFailure::RateLimited));
        self
    }

    /// Rate headers reported on every call.
    pub fn with_rate_status(self, rate: RateStatus) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.rate = rate;
        }
        self
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.state.lock().map(|s| s.requests.len()).unwrap_or(0)
    }

    fn set(&self, signature: String, outcome: std::result::Result<Value, MockFailure>) {
        if let Ok(mut state) = self.state.lock() {
            state.responses.insert(signature, outcome);
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: &ApiRequest, rate: &RateTracker) -> Result<Value> {
        let signature = request.signature();
        let (outcome, status) = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| FaqError::internal("mock transport poisoned"))?;
            state.requests.push(signature.clone());
            (state.responses.get(&signature).cloned(), state.rate)
        };

        match outcome {
            // A network failure never reaches the service, so no headers.
            Some(Err(MockFailure::Network)) => Err(FaqError::network()),
            Some(Err(failure)) => {
                rate.update(status);
                Err(failure.to_error())
            }
            Some(Ok(body)) => {
                rate.update(status);
                Ok(body)
            }
            None => {
                rate.update(status);
                Err(FaqError::api(404, format!("No mock response for {}", signature)))
            }
        }
    }
}
