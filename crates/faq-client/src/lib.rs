//! faq-client - Client for the FAQ service
//!
//! This crate performs the authenticated HTTP calls, caches responses and
//! tracks the rate-limit state reported by the service.
//!
//! # Components
//!
//! - [`HttpTransport`]: one authenticated GET per call, typed failures
//! - [`ResponseCache`]: time-bounded key/value store
//! - [`RateTracker`]: last observed rate-limit headers
//! - [`FaqClient`]: composes the three into the read operations
//!
//! # Example
//!
//! ```rust,ignore
//! use faq_client::FaqClient;
//! use faq_core::{Credential, EndpointConfig, FaqSource};
//!
//! let endpoint = EndpointConfig::new(Credential::parse("fq_live_key")?);
//! let client = FaqClient::new(endpoint)?;
//! let faqs = client.list_faqs().await?;
//! ```

mod cache;
mod client;
mod mock;
mod rate;
mod transport;

pub use cache::ResponseCache;
pub use client::FaqClient;
pub use mock::MockTransport;
pub use rate::RateTracker;
pub use transport::{ApiRequest, HttpTransport, Transport};

// Re-export the source trait for convenience
pub use faq_core::FaqSource;
