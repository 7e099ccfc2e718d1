use serde::Serialize;
use std::fmt::Display;

/// One ranked candidate from a similarity query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    pub title: String,
    /// Cosine similarity to the query, in [-1, 1]
    pub similarity: f32,
    /// Similarity relative to the best candidate, in [0, 100]
    pub percentage: f32,
}

impl Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "- {}: {:.2}% match", self.title, self.percentage)
    }
}
