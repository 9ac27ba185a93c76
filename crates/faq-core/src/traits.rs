//! Core traits defining the interfaces between components.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FaqContent, FaqSummary};

/// Read access to the FAQ knowledge base.
///
/// Implemented by the caching API client; the search engine only depends on
/// this trait.
#[async_trait]
pub trait FaqSource: Send + Sync {
    /// List every accessible FAQ.
    async fn list_faqs(&self) -> Result<Vec<FaqSummary>>;

    /// List every accessible FAQ with its questions and answers embedded.
    async fn list_faqs_with_questions(&self) -> Result<Vec<FaqSummary>>;

    /// Fetch the full content of one FAQ.
    async fn get_faq(&self, faq_id: &str) -> Result<FaqContent>;
}
