//! Rating- and keyword-based sentiment categorization.
//!
//! A numeric rating always wins over free text. Without a rating, tokens are
//! scanned left to right and the first keyword hit decides the category.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "excellent",
    "amazing",
    "love",
    "loved",
    "perfect",
    "fantastic",
    "wonderful",
    "brilliant",
    "happy",
    "recommend",
    "best",
];

const NEGATIVE_WORDS: &[&str] = &[
    "terrible",
    "awful",
    "bad",
    "poor",
    "broken",
    "disappointed",
    "disappointing",
    "horrible",
    "worst",
    "waste",
    "faulty",
    "refund",
];

/// Classify a rating and/or free text. Total and deterministic.
///
/// Ratings of 4 and above are positive, `[3, 4)` neutral, below 3 negative.
/// Only when no rating is present does the text matter.
pub fn classify(rating: Option<f64>, text: &str) -> Sentiment {
    if let Some(score) = rating {
        return if score >= 4.0 {
            Sentiment::Positive
        } else if score >= 3.0 {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        };
    }

    for token in text.split_whitespace() {
        let token = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if POSITIVE_WORDS.contains(&token.as_str()) {
            return Sentiment::Positive;
        }
        if NEGATIVE_WORDS.contains(&token.as_str()) {
            return Sentiment::Negative;
        }
    }

    Sentiment::Neutral
}
