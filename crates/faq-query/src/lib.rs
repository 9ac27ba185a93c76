//! faq-query - Search and ranking engine
//!
//! This crate fans a query out over every FAQ the source can see, matches
//! it against questions and answers, and ranks the hits.
//!
//! # Features
//!
//! - Case-insensitive substring matching on questions, then answers
//! - Word-overlap relevance scoring weighted towards the question
//! - Per-FAQ failure isolation: one broken FAQ never fails the search
//!
//! # Example
//!
//! ```rust,ignore
//! use faq_query::SearchEngine;
//! use std::sync::Arc;
//!
//! let engine = SearchEngine::new(Arc::new(client));
//! let results = engine.search("password reset").await?;
//! ```

mod engine;
mod scoring;

pub use engine::{SearchEngine, MAX_RESULTS};
pub use scoring::{contains_ignore_case, relevance_score, QUESTION_WEIGHT, ANSWER_WEIGHT};

// Re-export for convenience
pub use faq_core::SearchResult;
