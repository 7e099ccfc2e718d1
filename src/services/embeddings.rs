use std::sync::Arc;

use crate::{
    config::Config,
    db::EmbeddingCache,
    error::{AppError, AppResult},
    models::{Catalog, EmbeddingMap},
    services::providers::{EmbeddingProvider, OpenAiClient, ProviderError},
};

/// A catalog entry whose description could not be embedded
#[derive(Debug)]
pub struct EmbeddingFailure {
    pub title: String,
    pub error: ProviderError,
}

/// Outcome of loading or building the embedding store
#[derive(Debug)]
pub struct BuildReport {
    pub embeddings: EmbeddingMap,
    /// Entries skipped during a fresh build; always empty for a cache hit
    pub failures: Vec<EmbeddingFailure>,
    pub from_cache: bool,
}

/// Catalog embeddings, loaded from the cache or built through a provider
pub struct EmbeddingStore {
    cache: EmbeddingCache,
    provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl EmbeddingStore {
    /// Creates a store; `provider` may be `None` when no credential is configured
    pub fn new(cache: EmbeddingCache, provider: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self { cache, provider }
    }

    pub fn from_config(config: &Config) -> Self {
        let provider = match OpenAiClient::from_config(config) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn EmbeddingProvider>),
            Err(e) => {
                tracing::debug!(error = %e, "No embedding provider configured");
                None
            }
        };

        Self::new(EmbeddingCache::new(&config.embeddings_path), provider)
    }

    /// Returns cached embeddings if present, otherwise builds and caches them
    ///
    /// Cached vectors for titles that are no longer in the catalog are
    /// dropped. Catalog titles missing from the cache are only reported; they
    /// are not embedded until the cache is rebuilt.
    pub async fn load_or_build(&self, catalog: &Catalog) -> AppResult<BuildReport> {
        if self.cache.exists() {
            let mut embeddings = self.cache.load()?;
            tracing::info!(
                path = %self.cache.path().display(),
                embeddings = embeddings.len(),
                "Loaded embeddings from cache"
            );

            let orphans = embeddings.retain_titles(|title| catalog.contains(title));
            if !orphans.is_empty() {
                tracing::warn!(
                    count = orphans.len(),
                    titles = ?orphans,
                    "Dropped cached embeddings for titles not in the catalog"
                );
            }

            let missing = catalog.titles().filter(|t| !embeddings.contains(t)).count();
            if missing > 0 {
                tracing::warn!(
                    count = missing,
                    "Catalog titles without cached embeddings; delete the cache to rebuild"
                );
            }

            return Ok(BuildReport {
                embeddings,
                failures: Vec::new(),
                from_cache: true,
            });
        }

        tracing::info!(path = %self.cache.path().display(), "Embedding cache miss");
        self.build(catalog).await
    }

    /// Embeds every catalog description and writes the cache
    ///
    /// A failed entry is recorded in the report and skipped; it never stops
    /// the remaining entries. Fails up front if no provider is configured.
    pub async fn build(&self, catalog: &Catalog) -> AppResult<BuildReport> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(AppError::MissingCredential("OPENAI_API_KEY"))?;

        tracing::info!(
            entries = catalog.len(),
            provider = provider.name(),
            "Building embeddings"
        );

        let mut embeddings = EmbeddingMap::new();
        let mut failures = Vec::new();

        for entry in catalog.entries() {
            match provider.embed(&entry.description).await {
                Ok(vector) => embeddings.insert(entry.title.clone(), vector),
                Err(error) => {
                    tracing::warn!(title = %entry.title, error = %error, "Failed to embed description");
                    failures.push(EmbeddingFailure {
                        title: entry.title.clone(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            tracing::info!(embeddings = embeddings.len(), "Embeddings built");
        } else {
            tracing::warn!(
                success_count = embeddings.len(),
                error_count = failures.len(),
                "Partial embedding build failure"
            );
        }

        if embeddings.is_empty() {
            tracing::warn!("No embeddings produced, not writing cache");
        } else {
            self.cache.save(&embeddings)?;
        }

        Ok(BuildReport {
            embeddings,
            failures,
            from_cache: false,
        })
    }
}
