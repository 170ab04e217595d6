//! Search keyword extraction.
//!
//! Picks the most frequent substantive words of a segment as the stock-search
//! query. When a segment yields nothing usable, callers fall back to the run
//! topic.

use std::collections::HashMap;

/// Number of keywords per query.
const MAX_KEYWORDS: usize = 3;

/// Minimum word length considered substantive.
const MIN_WORD_LEN: usize = 4;

/// Common words that make poor search queries.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "almost", "along", "also", "always", "another", "around",
    "because", "been", "before", "being", "between", "both", "could", "does", "down", "during",
    "each", "even", "every", "from", "have", "having", "here", "into", "just", "like", "made",
    "make", "many", "more", "most", "much", "never", "only", "other", "over", "same", "some",
    "something", "still", "such", "than", "that", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "under", "until", "very", "were", "what", "when", "where",
    "which", "while", "will", "with", "within", "without", "would", "your",
];

/// Extract up to three search keywords from a segment, most frequent first.
/// Ties break toward earlier first appearance, keeping extraction
/// deterministic. Falls back to the topic when nothing substantive survives.
pub fn extract_keywords(text: &str, topic: &str) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for raw in text.split_whitespace() {
        let word: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if word.len() < MIN_WORD_LEN || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    if order.is_empty() {
        return vec![topic.trim().to_lowercase()];
    }

    let mut ranked: Vec<(usize, usize, String)> = order
        .into_iter()
        .enumerate()
        .map(|(pos, word)| (counts[&word], pos, word))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked.truncate(MAX_KEYWORDS);
    ranked.into_iter().map(|(_, _, word)| word).collect()
}

/// Join keywords into one provider query string.
pub fn build_query(keywords: &[String]) -> String {
    keywords.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_stopwords_and_short_words() {
        let keywords = extract_keywords(
            "The ocean is very deep and the ocean is very cold near hydrothermal vents",
            "the deep ocean",
        );
        assert_eq!(keywords[0], "ocean");
        assert!(!keywords.contains(&"very".to_string()));
        assert!(!keywords.contains(&"the".to_string()));
        assert!(keywords.len() <= 3);
    }

    #[test]
    fn test_frequency_wins_then_first_appearance() {
        let keywords = extract_keywords(
            "volcano eruption lava volcano ashes lava volcano",
            "volcanoes",
        );
        assert_eq!(keywords, vec!["volcano", "lava", "eruption"]);
    }

    #[test]
    fn test_falls_back_to_topic() {
        let keywords = extract_keywords("a b c the and", "Deep Ocean");
        assert_eq!(keywords, vec!["deep ocean"]);
    }

    #[test]
    fn test_strips_punctuation() {
        let keywords = extract_keywords("Mountains! Mountains? Rivers, forests.", "nature");
        assert_eq!(keywords[0], "mountains");
        assert!(keywords.contains(&"rivers".to_string()));
    }
}
