use std::sync::Arc;

use show_suggest::{
    db::{catalog::read_catalog, EmbeddingCache},
    error::AppError,
    models::{Catalog, EmbeddingMap},
    services::{
        aggregation::average_vector,
        embeddings::EmbeddingStore,
        providers::{EmbeddingProvider, ProviderError},
        recommendations::get_recommendations,
        similarity::nearest,
        title_search::TitleResolver,
    },
};

const CATALOG_CSV: &str = "\
Title,Description
Game of Thrones,dragons
Breaking Bad,chemistry
Stranger Things,upside down
The Witcher,monsters
Sherlock,detective
";

/// Embeds each description to a fixed vector
struct LookupProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for LookupProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let vector = match text {
            "dragons" => vec![0.1, 0.2, 0.3],
            "chemistry" => vec![0.4, 0.5, 0.6],
            "upside down" => vec![0.7, 0.8, 0.9],
            "monsters" => vec![0.15, 0.25, 0.35],
            "detective" => vec![0.45, 0.55, 0.65],
            other => {
                return Err(ProviderError::InvalidResponse(format!(
                    "no vector for {}",
                    other
                )))
            }
        };
        Ok(vector)
    }

    fn name(&self) -> &'static str {
        "lookup"
    }
}

fn catalog() -> Catalog {
    read_catalog(CATALOG_CSV.as_bytes()).unwrap()
}

async fn built_embeddings(dir: &std::path::Path) -> EmbeddingMap {
    let store = EmbeddingStore::new(
        EmbeddingCache::new(dir.join("embeddings.bin")),
        Some(Arc::new(LookupProvider)),
    );
    let report = store.load_or_build(&catalog()).await.unwrap();
    assert!(report.failures.is_empty());
    report.embeddings
}

#[test]
fn test_exact_titles_resolve_to_themselves() {
    let catalog = catalog();
    let resolver = TitleResolver::from_catalog(&catalog);

    for title in catalog.titles() {
        assert_eq!(resolver.resolve(&[title]), vec![title.to_string()]);
    }
}

#[test]
fn test_unknown_title_is_omitted() {
    let resolver = TitleResolver::from_catalog(&catalog());
    assert_eq!(
        resolver.resolve(&["zzz-no-such-show", "sherlock"]),
        vec!["Sherlock".to_string()]
    );
    assert!(matches!(
        resolver.resolve_any(&["zzz-no-such-show"]),
        Err(AppError::NoTitleMatch)
    ));
}

#[tokio::test]
async fn test_built_embeddings_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let built = built_embeddings(dir.path()).await;

    // no provider this time, so the cache has to be used
    let store = EmbeddingStore::new(EmbeddingCache::new(dir.path().join("embeddings.bin")), None);
    let report = store.load_or_build(&catalog()).await.unwrap();

    assert!(report.from_cache);
    assert_eq!(report.embeddings, built);
    assert_eq!(
        report.embeddings.titles().collect::<Vec<_>>(),
        catalog().titles().collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_average_of_two_titles() {
    let dir = tempfile::tempdir().unwrap();
    let embeddings = built_embeddings(dir.path()).await;

    let average = average_vector(&["Game of Thrones", "Breaking Bad"], &embeddings).unwrap();
    let expected = [0.25, 0.35, 0.45];
    for (got, want) in average.iter().zip(expected) {
        assert!((got - want).abs() < 1e-6);
    }

    assert_eq!(average_vector::<&str>(&[], &embeddings), None);
    assert_eq!(average_vector(&["Unknown"], &embeddings), None);
}

#[tokio::test]
async fn test_nearest_ranks_by_cosine_similarity() {
    let dir = tempfile::tempdir().unwrap();
    let embeddings = built_embeddings(dir.path()).await;

    let results = nearest(&[0.2, 0.3, 0.4], &embeddings, 3).unwrap();
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["The Witcher", "Breaking Bad", "Sherlock"]);
    assert_eq!(results[0].percentage, 100.0);

    let exact = nearest(&[0.7, 0.8, 0.9], &embeddings, 1).unwrap();
    assert_eq!(exact[0].title, "Stranger Things");
    assert_eq!(exact[0].percentage, 100.0);
}

#[tokio::test]
async fn test_liked_titles_never_recommended() {
    let dir = tempfile::tempdir().unwrap();
    let embeddings = built_embeddings(dir.path()).await;
    let titles: Vec<String> = catalog().titles().map(str::to_string).collect();

    for i in 0..titles.len() {
        for j in 0..titles.len() {
            let liked = [titles[i].clone(), titles[j].clone()];
            let result = get_recommendations(&liked, &embeddings, titles.len()).unwrap();

            assert!(result.iter().all(|r| !liked.contains(&r.title)));
            let distinct = if i == j { 1 } else { 2 };
            assert_eq!(result.len(), titles.len() - distinct);
        }
    }
}

#[tokio::test]
async fn test_recommendations_from_resolved_input() {
    let dir = tempfile::tempdir().unwrap();
    let embeddings = built_embeddings(dir.path()).await;
    let resolver = TitleResolver::from_catalog(&catalog());

    let liked = resolver.resolve(&["witcher", "breaking bad"]);
    assert_eq!(liked, vec!["The Witcher", "Breaking Bad"]);

    let result = get_recommendations(&liked, &embeddings, 2).unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|r| r.percentage > 0.0 && r.percentage <= 100.0));
}
