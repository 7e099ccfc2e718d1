use crate::models::EmbeddingMap;

/// Element-wise mean of the embeddings of the given titles
///
/// Titles without an embedding, or whose embedding does not match the
/// dimension of the first one found, are skipped with a warning. Duplicate
/// titles count once per occurrence. Returns `None` when no title had an embedding,
/// which callers should treat as "ask the user to try again".
pub fn average_vector<S: AsRef<str>>(titles: &[S], embeddings: &EmbeddingMap) -> Option<Vec<f32>> {
    let mut sum: Vec<f64> = Vec::new();
    let mut found = 0usize;

    for title in titles {
        let title = title.as_ref();
        let Some(vector) = embeddings.get(title) else {
            tracing::warn!(title = %title, "No embedding for title, skipping");
            continue;
        };

        if found == 0 {
            sum = vec![0.0; vector.len()];
        } else if vector.len() != sum.len() {
            tracing::warn!(
                title = %title,
                expected = sum.len(),
                got = vector.len(),
                "Embedding dimension mismatch, skipping"
            );
            continue;
        }
        for (acc, &x) in sum.iter_mut().zip(vector) {
            *acc += f64::from(x);
        }
        found += 1;
    }

    if found == 0 {
        return None;
    }

    let n = found as f64;
    Some(sum.into_iter().map(|total| (total / n) as f32).collect())
}
