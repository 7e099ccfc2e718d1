mod embedding;
mod fictional_show;
mod recommendation;
mod title;

pub use embedding::EmbeddingMap;
pub use fictional_show::{FictionalShow, ShowConcept};
pub use recommendation::MatchResult;
pub use title::{Catalog, CatalogEntry};
