use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Embedding vectors keyed by catalog title
///
/// Iteration follows insertion order, which is catalog order when the map was
/// built from a catalog. Similarity ties are broken by this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingMap(IndexMap<String, Vec<f32>>);

impl EmbeddingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: impl Into<String>, vector: Vec<f32>) {
        self.0.insert(title.into(), vector);
    }

    pub fn get(&self, title: &str) -> Option<&[f32]> {
        self.0.get(title).map(Vec::as_slice)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains_key(title)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.0.iter().map(|(title, vector)| (title.as_str(), vector.as_slice()))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Dimension of the first stored vector
    pub fn dimension(&self) -> Option<usize> {
        self.0.values().next().map(Vec::len)
    }

    /// Drops every title the predicate rejects, returning the dropped titles
    pub fn retain_titles<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let mut dropped = Vec::new();
        self.0.retain(|title, _| {
            if keep(title) {
                true
            } else {
                dropped.push(title.clone());
                false
            }
        });
        dropped
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Into<String>> FromIterator<(T, Vec<f32>)> for EmbeddingMap {
    fn from_iter<I: IntoIterator<Item = (T, Vec<f32>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(t, v)| (t.into(), v)).collect())
    }
}
