//! Markdown rendering of FAQ data for tool output.

use faq_core::{FaqContent, FaqSummary, RateStatus, SearchResult};

/// Render search hits, showing at most `limit` of them.
pub fn search_results(query: &str, results: &[SearchResult], limit: usize) -> String {
    if results.is_empty() {
        return format!("No results found for \"{}\".", query);
    }

    let shown = &results[..results.len().min(limit)];
    let mut out = format!(
        "Found {} result(s) for \"{}\":\n\n",
        shown.len(),
        query
    );

    for (i, result) in shown.iter().enumerate() {
        out.push_str(&format!("## {}. {}\n", i + 1, result.question));
        out.push_str(&format!("**FAQ:** {} (#{})\n", result.faq_name, result.faq_id));
        out.push_str(&format!("**Relevance:** {:.2}\n\n", result.relevance_score));
        out.push_str(&format!("{}\n\n", result.answer));
    }

    out.trim_end().to_string()
}

/// Render a full FAQ.
pub fn faq(content: &FaqContent) -> String {
    let mut out = format!("# {}\n\n", content.name);

    if let Some(overview) = content.overview.as_deref().filter(|o| !o.is_empty()) {
        out.push_str(&format!("{}\n\n", overview));
    }
    if let Some(url) = content.url.as_deref() {
        out.push_str(&format!("URL: {}\n\n", url));
    }

    out.push_str(&format!("Questions: {}\n\n", content.question_count));

    for question in &content.questions {
        let marker = if question.important == Some(true) {
            " ⭐"
        } else {
            ""
        };
        out.push_str(&format!("## {}{}\n", question.question, marker));
        if let Some(keywords) = question.keywords.as_deref().filter(|k| !k.is_empty()) {
            out.push_str(&format!("_Keywords: {}_\n", keywords));
        }
        for answer in &question.answers {
            out.push_str(&format!("\n{}\n", answer.answer));
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}

/// Render a list of FAQs, with their questions when present.
pub fn faq_list(faqs: &[FaqSummary]) -> String {
    if faqs.is_empty() {
        return "No FAQs found.".to_string();
    }

    let mut out = format!("Found {} FAQ(s):\n\n", faqs.len());
    for summary in faqs {
        out.push_str(&format!("- **{}** (#{})", summary.name, summary.id));
        if let Some(overview) = summary.overview.as_deref().filter(|o| !o.is_empty()) {
            out.push_str(&format!(": {}", overview));
        }
        out.push('\n');
        for question in &summary.questions {
            out.push_str(&format!("  - {}\n", question.question));
        }
    }

    out.trim_end().to_string()
}

/// Render rate-limit state.
pub fn rate_status(status: &RateStatus) -> String {
    let reset = status
        .reset_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "Rate limit status:\n\n- Remaining requests: {}\n- Resets at: {}",
        status.remaining, reset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_core::{Answer, Question};

    fn hit(score: f64) -> SearchResult {
        SearchResult {
            faq_id: "3".into(),
            faq_name: "Accounts".into(),
            question: "How do I reset my password?".into(),
            answer: "Use the reset link.".into(),
            relevance_score: score,
        }
    }

    #[test]
    fn test_search_results_limit() {
        let results = vec![hit(1.0), hit(0.7), hit(0.3)];
        let out = search_results("reset", &results, 2);
        assert!(out.starts_with("Found 2 result(s)"));
        assert!(out.contains("## 2."));
        assert!(!out.contains("## 3."));
        assert!(out.contains("**Relevance:** 1.00"));
    }

    #[test]
    fn test_search_results_empty() {
        assert_eq!(
            search_results("zzz", &[], 10),
            "No results found for \"zzz\"."
        );
    }

    #[test]
    fn test_faq_marks_important() {
        let content = FaqContent {
            id: "3".into(),
            name: "Accounts".into(),
            overview: Some("Sign-in help".into()),
            url: None,
            question_count: 1,
            questions: vec![Question {
                question: "How do I reset my password?".into(),
                keywords: None,
                important: Some(true),
                answers: vec![Answer {
                    answer: "Use the reset link.".into(),
                    keywords: None,
                }],
            }],
        };

        let out = faq(&content);
        assert!(out.starts_with("# Accounts"));
        assert!(out.contains("Sign-in help"));
        assert!(out.contains("## How do I reset my password? ⭐"));
        assert!(out.contains("Use the reset link."));
    }

    #[test]
    fn test_faq_list() {
        assert_eq!(faq_list(&[]), "No FAQs found.");

        let out = faq_list(&[FaqSummary {
            id: "1".into(),
            name: "General".into(),
            overview: None,
            url: None,
            questions: Vec::new(),
        }]);
        assert!(out.contains("- **General** (#1)"));
    }

    #[test]
    fn test_rate_status_unknown_reset() {
        let out = rate_status(&RateStatus {
            remaining: 12,
            reset: 0,
        });
        assert!(out.contains("Remaining requests: 12"));
        assert!(out.contains("Resets at: unknown"));
    }
}
