pub mod aggregation;
pub mod embeddings;
pub mod fictional_shows;
pub mod fuzzy;
pub mod providers;
pub mod recommendations;
pub mod similarity;
pub mod title_search;
