//! Request payloads and caller-side helpers for Sentino results.
//!
//! # Design
//! Responses stay as `serde_json::Value`: the service owns their shape and
//! the client passes them through untouched. Only the request bodies are
//! typed, so their field order and names are fixed at compile time.

use serde::Serialize;
use serde_json::Value;

/// Inventory requested by the score endpoint.
pub const BIG5_INVENTORY: &str = "big5";

/// Language used when the caller does not pick one.
pub const DEFAULT_LANG: &str = "en";

/// Trait names reported by the Big Five inventory.
pub const BIG5_TRAITS: [&str; 5] = [
    "openness",
    "conscientiousness",
    "extraversion",
    "agreeableness",
    "neuroticism",
];

/// Classification probabilities above this value are considered relevant.
pub const RELEVANCE_THRESHOLD: f64 = 0.5;

/// Body of `POST /score`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest<'a> {
    pub text: &'a str,
    pub inventories: &'a [&'a str],
    pub lang: &'a str,
}

impl<'a> ScoreRequest<'a> {
    pub fn big5(text: &'a str, lang: &'a str) -> Self {
        Self {
            text,
            inventories: &[BIG5_INVENTORY],
            lang,
        }
    }
}

/// Body of `POST /item/classify`.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest<'a> {
    pub text: &'a str,
}

/// Categories of a classification result whose probability exceeds
/// `RELEVANCE_THRESHOLD`, highest first.
///
/// Non-object results and non-numeric entries yield nothing.
pub fn relevant_categories(classification: &Value) -> Vec<(String, f64)> {
    let Some(map) = classification.as_object() else {
        return Vec::new();
    };
    let mut relevant: Vec<(String, f64)> = map
        .iter()
        .filter_map(|(name, p)| p.as_f64().map(|p| (name.clone(), p)))
        .filter(|(_, p)| *p > RELEVANCE_THRESHOLD)
        .collect();
    relevant.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    relevant
}
