//! Relevance scoring for question/answer pairs.

/// Share of the score earned by query words found in the question.
pub const QUESTION_WEIGHT: f64 = 0.7;

/// Share of the score earned by query words found in the answer.
pub const ANSWER_WEIGHT: f64 = 0.3;

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Score a candidate hit.
///
/// score = (query words found in question / query words) * 0.7
///       + (query words found in answer / query words) * 0.3
///
/// A query word is "found" when any whitespace-separated word of the text
/// contains it, ignoring case. Returns 0.0 for a query with no words.
pub fn relevance_score(query: &str, question: &str, answer: &str) -> f64 {
    let query_words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if query_words.is_empty() {
        return 0.0;
    }

    let question_words = lowercase_words(question);
    let answer_words = lowercase_words(answer);

    let question_matches = count_matches(&query_words, &question_words);
    let answer_matches = count_matches(&query_words, &answer_words);

    let total = query_words.len() as f64;
    let score = (question_matches as f64 / total) * QUESTION_WEIGHT
        + (answer_matches as f64 / total) * ANSWER_WEIGHT;

    score.clamp(0.0, 1.0)
}

fn lowercase_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn count_matches(query_words: &[String], text_words: &[String]) -> usize {
    query_words
        .iter()
        .filter(|qw| text_words.iter().any(|w| w.contains(qw.as_str())))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_full_credit() {
        let score = relevance_score(
            "password reset",
            "How do I reset my password?",
            "Use the reset password link on the sign-in page.",
        );
        assert!(approx(score, 1.0), "score = {}", score);
    }

    #[test]
    fn test_partial_answer_credit() {
        // "reset" only appears in the question.
        let score = relevance_score(
            "password reset",
            "How do I reset my password?",
            "Click forgot password and follow the steps.",
        );
        assert!(approx(score, 0.85), "score = {}", score);
    }

    #[test]
    fn test_question_outweighs_answer() {
        let in_question = relevance_score("invoice", "Where is my invoice?", "See billing.");
        let in_answer = relevance_score("invoice", "Where is billing?", "See your invoice.");
        assert!(in_question > in_answer);
        assert!(approx(in_question, QUESTION_WEIGHT));
        assert!(approx(in_answer, ANSWER_WEIGHT));
    }

    #[test]
    fn test_word_substring_and_case() {
        // "pass" is contained in "PASSWORD".
        let score = relevance_score("PASS", "Change PASSWORD", "nothing here");
        assert!(approx(score, 0.7));
    }

    #[test]
    fn test_score_bounds() {
        let cases = [
            ("a b c", "a", "b"),
            ("zzz", "question", "answer"),
            ("x x x", "x", "x"),
            ("shipping cost", "What does shipping cost?", "Shipping cost is free."),
        ];
        for (query, question, answer) in cases {
            let score = relevance_score(query, question, answer);
            assert!((0.0..=1.0).contains(&score), "{} -> {}", query, score);
        }
    }

    #[test]
    fn test_empty_query_scores_zero() {
        assert_eq!(relevance_score("   ", "question", "answer"), 0.0);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("How do I Reset my password?", "reset MY"));
        assert!(!contains_ignore_case("How do I reset?", "refund"));
    }
}
