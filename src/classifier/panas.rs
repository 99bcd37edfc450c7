//! PANAS-t lexicon classifier
//!
//! Texts are matched against the mood adjectives of the PANAS-x scale,
//! grouped into eleven categories. A text only qualifies when it reads as
//! a first-person self report ("I am ...", "I feel ...").

use std::collections::HashMap;

use crate::error::Error;
use crate::types::Category;
use crate::Result;

use super::Classifier;

/// Category labels with their lexicons, in canonical order
const LEXICON: &[(&str, &[&str])] = &[
    (
        "jovility",
        &[
            "happy", "cheerful", "joyful", "delighted", "excited", "enthusiastic", "lively",
            "energetic", "glad",
        ],
    ),
    ("assurance", &["proud", "strong", "confident", "bold", "daring", "fearless"]),
    ("attentiveness", &["alert", "attentive", "concentrating", "determined"]),
    ("serenity", &["calm", "relaxed", "serene", "peaceful"]),
    ("surprise", &["amazed", "surprised", "astonished"]),
    ("fear", &["afraid", "scared", "frightened", "nervous", "jittery", "shaky"]),
    ("sadness", &["sad", "blue", "downhearted", "alone", "lonely"]),
    ("guilt", &["guilty", "ashamed", "blameworthy"]),
    (
        "hostility",
        &["angry", "hostile", "irritable", "scornful", "disgusted", "loathing"],
    ),
    ("shyness", &["shy", "bashful", "sheepish", "timid"]),
    ("fatigue", &["sleepy", "tired", "sluggish", "drowsy"]),
];

/// Token sequences marking a first-person self report
const SELF_REPORT_PATTERNS: &[&[&str]] = &[
    &["i", "am"],
    &["i'm"],
    &["im"],
    &["i", "feel"],
    &["feeling"],
    &["makes", "me"],
    &["made", "me"],
];

/// Lexicon-based classifier following the PANAS-t method
pub struct PanasClassifier {
    /// Categories in canonical order
    categories: Vec<Category>,
    /// Term -> index into `categories`
    terms: HashMap<&'static str, usize>,
}

impl PanasClassifier {
    /// Create a classifier over the built-in lexicon
    pub fn new() -> Self {
        let mut categories = Vec::with_capacity(LEXICON.len());
        let mut terms = HashMap::new();

        for (idx, (label, words)) in LEXICON.iter().enumerate() {
            categories.push(Category::from(*label));
            for word in words.iter() {
                terms.insert(*word, idx);
            }
        }

        Self { categories, terms }
    }

    /// Lowercase word tokens; apostrophes are kept inside words
    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .replace('\u{2019}', "'")
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|token| token.trim_matches('\''))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn is_self_report(tokens: &[String]) -> bool {
        SELF_REPORT_PATTERNS.iter().any(|pattern| {
            tokens
                .windows(pattern.len())
                .any(|window| window.iter().zip(pattern.iter()).all(|(t, p)| t == p))
        })
    }
}

impl Default for PanasClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for PanasClassifier {
    fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn classify(&self, text: &str) -> Vec<Category> {
        let mut matched = vec![false; self.categories.len()];
        for token in Self::tokenize(text) {
            if let Some(&idx) = self.terms.get(token.as_str()) {
                matched[idx] = true;
            }
        }

        self.categories
            .iter()
            .zip(matched)
            .filter(|(_, hit)| *hit)
            .map(|(category, _)| category.clone())
            .collect()
    }

    fn validate(&self, text: &str) -> bool {
        let tokens = Self::tokenize(text);
        !tokens.is_empty() && Self::is_self_report(&tokens)
    }

    fn aggregate(&self, count: i64, total: i64) -> Result<f64> {
        if count < 0 || total <= 0 || count > total {
            return Err(Error::InvalidAggregate { count, total });
        }
        Ok(count as f64 / total as f64)
    }
}
