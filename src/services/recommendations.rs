use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{EmbeddingMap, MatchResult},
    services::{aggregation::average_vector, similarity::SimilarityIndex},
};

/// Recommends shows similar to the ones the user liked
///
/// The liked titles (already resolved against the catalog) are averaged into
/// one query vector and matched against every catalog embedding. Liked titles
/// never appear in the result. Percentages are relative to the best candidate
/// before liked titles are removed, so the first recommendation can be below
/// 100% when a liked show was the closest match.
pub fn get_recommendations<S: AsRef<str>>(
    liked_titles: &[S],
    embeddings: &EmbeddingMap,
    count: usize,
) -> AppResult<Vec<MatchResult>> {
    let query = average_vector(liked_titles, embeddings).ok_or(AppError::NoEmbeddingsAvailable)?;

    let excluded: HashSet<&str> = liked_titles.iter().map(|t| t.as_ref()).collect();

    // every liked title could rank above the first real recommendation
    let candidates = SimilarityIndex::build(embeddings)?
        .nearest(&query, count.saturating_add(excluded.len()))?;

    let recommendations: Vec<MatchResult> = candidates
        .into_iter()
        .filter(|candidate| !excluded.contains(candidate.title.as_str()))
        .take(count)
        .collect();

    tracing::info!(
        liked = excluded.len(),
        recommendations = recommendations.len(),
        "Recommendations generated"
    );

    Ok(recommendations)
}
