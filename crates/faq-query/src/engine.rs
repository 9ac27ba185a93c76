//! Query engine fanning a search out over every FAQ.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use faq_core::{FaqContent, FaqSource, Result, SearchResult};

use crate::scoring::{contains_ignore_case, relevance_score};

/// Maximum number of results a search returns.
pub const MAX_RESULTS: usize = 10;

/// Outcome of fetching one FAQ during the scan.
struct FetchOutcome {
    faq_id: String,
    content: Result<FaqContent>,
}

/// Substring search with word-overlap ranking.
///
/// FAQs are fetched one after another; a FAQ that fails to load is logged
/// and left out of the results.
pub struct SearchEngine<S> {
    source: Arc<S>,
}

impl<S> SearchEngine<S>
where
    S: FaqSource,
{
    /// Create a new search engine.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Search every FAQ for `query`.
    ///
    /// Returns at most [`MAX_RESULTS`] hits ordered by descending score;
    /// equal scores keep scan order. An empty or blank query returns nothing
    /// without touching the source; any other query is matched verbatim,
    /// surrounding whitespace included.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        info!("Searching for: {:?}", query);

        let faqs = self.source.list_faqs_with_questions().await?;
        debug!("Scanning {} FAQs", faqs.len());

        let mut outcomes = Vec::with_capacity(faqs.len());
        for summary in &faqs {
            outcomes.push(FetchOutcome {
                faq_id: summary.id.clone(),
                content: self.source.get_faq(&summary.id).await,
            });
        }

        let mut results = Vec::new();
        let mut failed = 0usize;
        for outcome in outcomes {
            match outcome.content {
                Ok(content) => results.extend(match_faq(&content, query)),
                Err(e) => {
                    failed += 1;
                    warn!("Skipping FAQ {} during search: {}", outcome.faq_id, e);
                }
            }
        }

        let total_matches = results.len();
        let ranked = rank(results);

        info!(
            "Search completed in {}ms: {} matches, {} returned, {} FAQs skipped",
            start.elapsed().as_millis(),
            total_matches,
            ranked.len(),
            failed
        );

        Ok(ranked)
    }
}

/// Collect every hit in one FAQ, in question order.
///
/// A question containing the query yields all of its answers. Otherwise each
/// answer containing the query yields itself.
fn match_faq(content: &FaqContent, query: &str) -> Vec<SearchResult> {
    let mut hits = Vec::new();

    for question in &content.questions {
        let question_matches = contains_ignore_case(&question.question, query);

        for answer in &question.answers {
            if question_matches || contains_ignore_case(&answer.answer, query) {
                hits.push(SearchResult {
                    faq_id: content.id.clone(),
                    faq_name: content.name.clone(),
                    question: question.question.clone(),
                    answer: answer.answer.clone(),
                    relevance_score: relevance_score(query, &question.question, &answer.answer),
                });
            }
        }
    }

    hits
}

/// Stable sort by descending score, then truncate.
fn rank(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    results.truncate(MAX_RESULTS);
    results
}
