pub mod cache;
pub mod catalog;

pub use cache::EmbeddingCache;
pub use catalog::load_catalog;
