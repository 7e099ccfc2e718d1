use crate::{
    error::{AppError, AppResult},
    models::{EmbeddingMap, MatchResult},
};

const MIN_NORM_PRODUCT: f64 = 1e-12;

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0_f64, |acc, (&x, &y)| f64::from(x).mul_add(f64::from(y), acc))
}

fn norm(v: &[f32]) -> f64 {
    dot(v, v).sqrt()
}

/// Cosine similarity between two vectors of equal length
///
/// Returns a value in [-1.0, 1.0]. A zero-magnitude vector has no direction,
/// so its similarity to anything is 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    cosine_with_norms(a, norm(a), b, norm(b))
}

/// Cosine similarity with both norms already known
fn cosine_with_norms(a: &[f32], a_norm: f64, b: &[f32], b_norm: f64) -> f64 {
    let denom = a_norm * b_norm;
    if denom < MIN_NORM_PRODUCT {
        return 0.0;
    }
    let similarity = (dot(a, b) / denom).clamp(-1.0, 1.0);
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

struct IndexedVector<'a> {
    title: &'a str,
    vector: &'a [f32],
    norm: f64,
}

/// Exact nearest-neighbour index over a set of embeddings
///
/// Built per query from the embedding map and dropped afterwards. Every
/// vector is scored, so the top-K is exact cosine ranking. Vector norms are
/// computed once at build time.
pub struct SimilarityIndex<'a> {
    entries: Vec<IndexedVector<'a>>,
    dimension: Option<usize>,
}

impl<'a> SimilarityIndex<'a> {
    /// Indexes every embedding, requiring all of them to share one dimension
    pub fn build(embeddings: &'a EmbeddingMap) -> AppResult<Self> {
        let dimension = embeddings.dimension();
        let mut entries = Vec::with_capacity(embeddings.len());

        for (title, vector) in embeddings.iter() {
            if let Some(expected) = dimension {
                if vector.len() != expected {
                    return Err(AppError::DimensionMismatch {
                        title: title.to_string(),
                        expected,
                        got: vector.len(),
                    });
                }
            }
            entries.push(IndexedVector {
                title,
                vector,
                norm: norm(vector),
            });
        }

        tracing::debug!(vectors = entries.len(), dimension = ?dimension, "Built similarity index");

        Ok(Self { entries, dimension })
    }

    /// The `top_n` most similar titles to `query`, best first
    ///
    /// Equal similarities keep index order. Percentages are relative to the
    /// best similarity among all indexed vectors, so the top hit is 100%.
    pub fn nearest(&self, query: &[f32], top_n: usize) -> AppResult<Vec<MatchResult>> {
        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != dimension {
            return Err(AppError::DimensionMismatch {
                title: "<query>".to_string(),
                expected: dimension,
                got: query.len(),
            });
        }

        let query_norm = norm(query);
        let mut scored: Vec<(&str, f64)> = self
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.title,
                    cosine_with_norms(query, query_norm, entry.vector, entry.norm),
                )
            })
            .collect();

        // stable: ties stay in index order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let max_similarity = scored.first().map_or(0.0, |&(_, s)| s);

        Ok(scored
            .into_iter()
            .take(top_n)
            .map(|(title, similarity)| MatchResult {
                title: title.to_string(),
                similarity: similarity as f32,
                percentage: relative_percentage(similarity, max_similarity) as f32,
            })
            .collect())
    }
}

/// `similarity / max_similarity * 100`, clamped into [0, 100]
///
/// When the best similarity is not positive there is no meaningful scale and
/// every candidate gets 0.
fn relative_percentage(similarity: f64, max_similarity: f64) -> f64 {
    if max_similarity <= 0.0 {
        return 0.0;
    }
    (similarity / max_similarity * 100.0).clamp(0.0, 100.0)
}

/// Builds a throwaway index and queries it once
pub fn nearest(
    query: &[f32],
    embeddings: &EmbeddingMap,
    top_n: usize,
) -> AppResult<Vec<MatchResult>> {
    SimilarityIndex::build(embeddings)?.nearest(query, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_embeddings() -> EmbeddingMap {
        vec![
            ("Game of Thrones", vec![0.1, 0.2, 0.3]),
            ("Breaking Bad", vec![0.4, 0.5, 0.6]),
            ("Stranger Things", vec![0.7, 0.8, 0.9]),
            ("The Witcher", vec![0.15, 0.25, 0.35]),
            ("Sherlock", vec![0.45, 0.55, 0.65]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_nearest_agrees_with_cosine_similarity() {
        let embeddings = show_embeddings();
        let query = [0.2, 0.3, 0.4];

        for result in nearest(&query, &embeddings, 5).unwrap() {
            let vector = embeddings.get(&result.title).unwrap();
            let expected = cosine_similarity(&query, vector) as f32;
            assert_eq!(result.similarity, expected, "{}", result.title);
        }
    }

    #[test]
    fn test_find_closest_shows_valid_input() {
        let embeddings = show_embeddings();
        let result = nearest(&[0.2, 0.3, 0.4], &embeddings, 3).unwrap();

        let expected = [
            ("The Witcher", 0.9988),
            ("Breaking Bad", 0.9946),
            ("Sherlock", 0.9930),
        ];
        assert_eq!(result.len(), 3);
        for ((title, similarity), actual) in expected.iter().zip(&result) {
            assert_eq!(actual.title, *title);
            assert!(
                (actual.similarity - similarity).abs() < 1e-4,
                "{} similarity {}",
                actual.title,
                actual.similarity
            );
        }
        assert_eq!(result[0].percentage, 100.0);
        assert!(result[1].percentage < 100.0 && result[1].percentage > 99.0);
    }

    #[test]
    fn test_query_equal_to_stored_vector_ranks_first() {
        let embeddings: EmbeddingMap = vec![
            ("A", vec![1.0, 0.0, 0.0]),
            ("B", vec![0.0, 1.0, 0.0]),
            ("C", vec![0.5, 0.5, 0.7]),
        ]
        .into_iter()
        .collect();

        let result = nearest(&[0.0, 1.0, 0.0], &embeddings, 3).unwrap();

        assert_eq!(result[0].title, "B");
        assert_eq!(result[0].percentage, 100.0);
        assert_eq!(result[2].title, "A");
        assert_eq!(result[2].percentage, 0.0);
    }

    #[test]
    fn test_percentage_independent_of_top_n() {
        let embeddings = show_embeddings();
        let all = nearest(&[0.2, 0.3, 0.4], &embeddings, 5).unwrap();
        let tail = nearest(&[0.2, 0.3, 0.4], &embeddings, 1).unwrap();

        assert_eq!(all[0], tail[0]);
        let expected = all[4].similarity / all[0].similarity * 100.0;
        assert!((all[4].percentage - expected).abs() < 1e-3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let embeddings: EmbeddingMap = vec![
            ("Twin A", vec![1.0, 1.0]),
            ("Other", vec![1.0, 0.0]),
            ("Twin B", vec![1.0, 1.0]),
        ]
        .into_iter()
        .collect();

        let result = nearest(&[3.0, 3.0], &embeddings, 2).unwrap();

        assert_eq!(result[0].title, "Twin A");
        assert_eq!(result[1].title, "Twin B");
        assert_eq!(result[1].percentage, 100.0);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let embeddings: EmbeddingMap = vec![("Blank", vec![0.0, 0.0]), ("Real", vec![1.0, 2.0])]
            .into_iter()
            .collect();

        let result = nearest(&[1.0, 2.0], &embeddings, 5).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "Real");
        assert_eq!(result[1].similarity, 0.0);
        assert_eq!(result[1].percentage, 0.0);
    }

    #[test]
    fn test_non_positive_best_similarity_gives_zero_percentages() {
        let embeddings: EmbeddingMap = vec![("Opposite", vec![-1.0, 0.0])].into_iter().collect();

        let result = nearest(&[1.0, 0.0], &embeddings, 1).unwrap();

        assert!((result[0].similarity + 1.0).abs() < 1e-6);
        assert_eq!(result[0].percentage, 0.0);
    }

    #[test]
    fn test_empty_store_gives_empty_result() {
        let result = nearest(&[0.1, 0.2], &EmbeddingMap::new(), 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_top_n_larger_than_store() {
        let result = nearest(&[0.2, 0.3, 0.4], &show_embeddings(), 50).unwrap();
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_mismatched_store_dimension_is_rejected() {
        let embeddings: EmbeddingMap = vec![("A", vec![0.1, 0.2, 0.3]), ("B", vec![0.1, 0.2])]
            .into_iter()
            .collect();

        let result = SimilarityIndex::build(&embeddings);

        assert!(matches!(
            result,
            Err(AppError::DimensionMismatch { ref title, expected: 3, got: 2 }) if title == "B"
        ));
    }

    #[test]
    fn test_mismatched_query_dimension_is_rejected() {
        let embeddings = show_embeddings();
        let result = nearest(&[0.2, 0.3], &embeddings, 3);
        assert!(matches!(
            result,
            Err(AppError::DimensionMismatch { expected: 3, got: 2, .. })
        ));
    }
}
