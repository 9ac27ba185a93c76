//! Caching FAQ client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use faq_core::{
    Credential, EndpointConfig, FaqContent, FaqError, FaqSource, FaqSummary, HealthStatus,
    RateStatus, Result,
};

use crate::cache::ResponseCache;
use crate::rate::RateTracker;
use crate::transport::{ApiRequest, HttpTransport, Transport};

const OP_LIST_FAQS: &str = "list_faqs";
const OP_LIST_FAQS_WITH_QUESTIONS: &str = "list_faqs_with_questions";
const OP_GET_FAQ: &str = "get_faq";

const KEY_FAQS: &str = "faqs";
const KEY_FAQS_WITH_QUESTIONS: &str = "faqs_with_questions";
const KEY_FAQ_PREFIX: &str = "faq:";

/// Client for the FAQ service.
///
/// Every read checks the cache first and only reaches the transport on a
/// miss. Cache and rate state belong to this instance alone.
pub struct FaqClient<T = HttpTransport> {
    transport: T,
    cache: ResponseCache<Arc<Value>>,
    rate: RateTracker,
}

impl FaqClient<HttpTransport> {
    /// Create a client that talks HTTP to `endpoint`.
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        let transport = HttpTransport::new(&endpoint)?;
        Ok(Self::with_transport(endpoint, transport))
    }

    /// Create a client with default endpoint settings from a raw API key.
    pub fn from_api_key(api_key: &str) -> Result<Self> {
        Self::new(EndpointConfig::new(Credential::parse(api_key)?))
    }
}

impl<T: Transport> FaqClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(endpoint: EndpointConfig, transport: T) -> Self {
        info!(
            "FAQ client for {} (cache ttl {:?})",
            endpoint.base_url, endpoint.cache_ttl
        );
        Self {
            cache: ResponseCache::new(endpoint.cache_ttl),
            rate: RateTracker::new(),
            transport,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Rate-limit status from the last response. Never touches the network.
    pub fn rate_status(&self) -> RateStatus {
        self.rate.status()
    }

    /// Drop all cached responses.
    pub fn clear_cache(&self) {
        info!("Clearing response cache ({} entries)", self.cache.len());
        self.cache.clear();
    }

    /// Return the cached payload for `key`, fetching it on a miss.
    async fn cached_get(&self, key: &str, request: ApiRequest) -> Result<Arc<Value>> {
        if let Some(hit) = self.cache.get(key) {
            debug!("Cache hit: {}", key);
            return Ok(hit);
        }

        debug!("Cache miss: {} -> {}", key, request.signature());
        let payload = Arc::new(self.transport.get(&request, &self.rate).await?);
        self.cache.put(key, payload.clone());
        Ok(payload)
    }

    /// Minimal list call, classified for a startup diagnostic.
    pub async fn health_check(&self) -> HealthStatus {
        match self.list_faqs().await {
            Ok(_) => HealthStatus::Ok,
            Err(FaqError::Network { .. }) => HealthStatus::ConnectionError,
            Err(e) if e.is_auth_error() => HealthStatus::AuthError,
            Err(e) => HealthStatus::Error(e.to_string()),
        }
    }
}

#[async_trait]
impl<T: Transport> FaqSource for FaqClient<T> {
    async fn list_faqs(&self) -> Result<Vec<FaqSummary>> {
        let payload = self
            .cached_get(KEY_FAQS, ApiRequest::new(OP_LIST_FAQS))
            .await?;
        decode_list(&payload)
    }

    async fn list_faqs_with_questions(&self) -> Result<Vec<FaqSummary>> {
        let payload = self
            .cached_get(
                KEY_FAQS_WITH_QUESTIONS,
                ApiRequest::new(OP_LIST_FAQS_WITH_QUESTIONS),
            )
            .await?;
        decode_list(&payload)
    }

    async fn get_faq(&self, faq_id: &str) -> Result<FaqContent> {
        let faq_id = faq_id.trim();
        if faq_id.is_empty() {
            return Err(FaqError::invalid_argument("faq_number is required"));
        }

        let key = format!("{}{}", KEY_FAQ_PREFIX, faq_id);
        let request = ApiRequest::new(OP_GET_FAQ).with_param("faq_number", Some(faq_id));
        let payload = self.cached_get(&key, request).await?;
        decode_content(&payload)
    }
}

/// Lists arrive bare or wrapped in `{"faqs": [...]}`.
fn decode_list(payload: &Value) -> Result<Vec<FaqSummary>> {
    let items = payload
        .get("faqs")
        .or_else(|| payload.get("data"))
        .unwrap_or(payload);
    Ok(Vec::<FaqSummary>::deserialize(items)?)
}

/// Content arrives bare or wrapped in `{"faq": {...}}`.
fn decode_content(payload: &Value) -> Result<FaqContent> {
    let body = payload.get("faq").unwrap_or(payload);
    let mut content = FaqContent::deserialize(body)?;
    if content.question_count == 0 {
        content.question_count = content.questions.len();
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;

    use crate::mock::MockTransport;

    fn endpoint() -> EndpointConfig {
        EndpointConfig::new(Credential::parse("fq_test").unwrap())
    }

    fn faq_json(id: u32) -> Value {
        json!({
            "faq_number": id,
            "name": format!("FAQ {}", id),
            "questions": [{
                "question": "How do I reset my password?",
                "answers": [{ "answer": "Click forgot password." }]
            }]
        })
    }

    #[test]
    fn test_bad_credential_fails_before_network() {
        let err = FaqClient::from_api_key("sk_wrong").err().unwrap();
        assert!(matches!(err, FaqError::Config { .. }));
    }

    #[tokio::test]
    async fn test_list_is_cached() {
        let mock = MockTransport::new().with_response(
            OP_LIST_FAQS,
            json!([{ "faq_number": 1, "name": "General" }]),
        );
        let client = FaqClient::with_transport(endpoint(), mock);

        let first = client.list_faqs().await.unwrap();
        let second = client.list_faqs().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].id, "1");
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_payload_is_shared() {
        let mock = MockTransport::new().with_response(OP_LIST_FAQS, json!([]));
        let client = FaqClient::with_transport(endpoint(), mock);

        let first = client
            .cached_get(KEY_FAQS, ApiRequest::new(OP_LIST_FAQS))
            .await
            .unwrap();
        let second = client
            .cached_get(KEY_FAQS, ApiRequest::new(OP_LIST_FAQS))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let mock = MockTransport::new().with_response(OP_LIST_FAQS, json!([]));
        let client =
            FaqClient::with_transport(endpoint().with_cache_ttl(Duration::ZERO), mock);

        client.list_faqs().await.unwrap();
        client.list_faqs().await.unwrap();
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_key_spaces_are_disjoint() {
        let mock = MockTransport::new()
            .with_response(OP_LIST_FAQS, json!({ "faqs": [{ "faq_number": 1, "name": "A" }] }))
            .with_response(OP_LIST_FAQS_WITH_QUESTIONS, json!([faq_json(1)]))
            .with_response("get_faq?faq_number=1", faq_json(1))
            .with_response("get_faq?faq_number=2", faq_json(2));
        let client = FaqClient::with_transport(endpoint(), mock);

        let plain = client.list_faqs().await.unwrap();
        let with_questions = client.list_faqs_with_questions().await.unwrap();
        let one = client.get_faq("1").await.unwrap();
        let two = client.get_faq("2").await.unwrap();

        assert!(plain[0].questions.is_empty());
        assert_eq!(with_questions[0].questions.len(), 1);
        assert_eq!(one.id, "1");
        assert_eq!(two.id, "2");
        assert_eq!(two.question_count, 1);
        assert_eq!(client.transport().calls(), 4);
    }

    #[tokio::test]
    async fn test_empty_id_is_invalid_argument() {
        let client = FaqClient::with_transport(endpoint(), MockTransport::new());

        let err = client.get_faq("  ").await.unwrap_err();
        assert!(matches!(err, FaqError::InvalidArgument { .. }));
        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_errors_propagate_and_are_not_cached() {
        let mock = MockTransport::new().with_api_error("get_faq?faq_number=9", 500, "boom");
        let client = FaqClient::with_transport(endpoint(), mock);

        for _ in 0..2 {
            let err = client.get_faq("9").await.unwrap_err();
            assert!(matches!(err, FaqError::Api { status: 500, .. }));
        }
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_rate_status_updates_on_failure() {
        let mock = MockTransport::new()
            .with_rate_limit(OP_LIST_FAQS)
            .with_rate_status(RateStatus {
                remaining: 0,
                reset: 1_700_000_000,
            });
        let client = FaqClient::with_transport(endpoint(), mock);

        let err = client.list_faqs().await.unwrap_err();
        assert!(matches!(err, FaqError::RateLimited { .. }));
        assert_eq!(client.rate_status().reset, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let mock = MockTransport::new().with_response(OP_LIST_FAQS, json!([]));
        let client = FaqClient::with_transport(endpoint(), mock);

        client.list_faqs().await.unwrap();
        client.clear_cache();
        client.list_faqs().await.unwrap();
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test]
    async fn test_health_check_classification() {
        let ok = FaqClient::with_transport(
            endpoint(),
            MockTransport::new().with_response(OP_LIST_FAQS, json!([])),
        );
        assert_eq!(ok.health_check().await, HealthStatus::Ok);

        let offline = FaqClient::with_transport(
            endpoint(),
            MockTransport::new().with_network_error(OP_LIST_FAQS),
        );
        assert_eq!(offline.health_check().await, HealthStatus::ConnectionError);

        let denied = FaqClient::with_transport(
            endpoint(),
            MockTransport::new().with_api_error(OP_LIST_FAQS, 403, "forbidden"),
        );
        assert_eq!(denied.health_check().await, HealthStatus::AuthError);

        let broken = FaqClient::with_transport(
            endpoint(),
            MockTransport::new().with_api_error(OP_LIST_FAQS, 502, "upstream down"),
        );
        match broken.health_check().await {
            HealthStatus::Error(message) => assert!(message.contains("upstream down")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
