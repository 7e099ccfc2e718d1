use crate::{
    models::{Catalog, EmbeddingMap},
    services::{fictional_shows::FictionalShowStudio, title_search::TitleResolver},
};

/// Everything a session needs, built once at startup
///
/// The embeddings are treated as immutable for the rest of the process.
pub struct AppState {
    pub resolver: TitleResolver,
    pub embeddings: EmbeddingMap,
    pub recommendation_count: usize,
    /// Present when fictional shows can be written
    pub studio: Option<FictionalShowStudio>,
}

impl AppState {
    pub fn new(
        catalog: &Catalog,
        embeddings: EmbeddingMap,
        recommendation_count: usize,
        studio: Option<FictionalShowStudio>,
    ) -> Self {
        Self {
            resolver: TitleResolver::from_catalog(catalog),
            embeddings,
            recommendation_count,
            studio,
        }
    }
}
