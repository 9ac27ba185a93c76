//! Core domain types for the FAQ bridge.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A FAQ as returned by the list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqSummary {
    /// FAQ identifier. The service sends it as a number or a string.
    #[serde(rename = "faq_number", deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short description of the FAQ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,

    /// Public URL of the FAQ page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Questions, only present on the "with questions" listing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

/// A FAQ with all of its questions and answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqContent {
    #[serde(rename = "faq_number", deserialize_with = "id_from_string_or_number")]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Questions in display order.
    #[serde(default)]
    pub questions: Vec<Question>,

    /// Number of questions as reported by the service.
    #[serde(default)]
    pub question_count: usize,
}

/// A single question with its answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Flagged by the FAQ owner as important.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,

    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// An answer to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the FAQ the hit came from.
    pub faq_id: String,

    /// Display name of that FAQ.
    pub faq_name: String,

    /// Matched question text.
    pub question: String,

    /// Answer text.
    pub answer: String,

    /// Relevance score in `[0, 1]` (higher is better).
    pub relevance_score: f64,
}

/// Rate-limit state as last reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateStatus {
    /// Requests left in the current window.
    pub remaining: u64,

    /// Window reset as Unix seconds; 0 when unknown.
    pub reset: u64,
}

impl RateStatus {
    /// Reset time as a timestamp, if the service reported one.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        if self.reset == 0 {
            return None;
        }
        i64::try_from(self.reset)
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }
}

/// Outcome of the startup health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    ConnectionError,
    AuthError,
    Error(String),
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::ConnectionError => write!(f, "connection error"),
            Self::AuthError => write!(f, "authentication error"),
            Self::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Accept `"12"` and `12` alike for FAQ identifiers.
fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
