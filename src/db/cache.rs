use std::path::{Path, PathBuf};

use crate::{error::AppResult, models::EmbeddingMap};

/// On-disk cache of catalog embeddings
///
/// The cache is a single bincode blob. It is read at most once per process
/// and rewritten only after a full build.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    path: PathBuf,
}

impl EmbeddingCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the cached embeddings exactly as they were saved
    pub fn load(&self) -> AppResult<EmbeddingMap> {
        let bytes = std::fs::read(&self.path)?;
        let embeddings: EmbeddingMap = bincode::deserialize(&bytes)?;

        tracing::debug!(
            path = %self.path.display(),
            embeddings = embeddings.len(),
            "Read embedding cache"
        );

        Ok(embeddings)
    }

    /// Writes the embeddings, replacing any previous cache
    ///
    /// The blob is written next to the target and renamed into place so a
    /// crash never leaves a truncated cache behind.
    pub fn save(&self, embeddings: &EmbeddingMap) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = bincode::serialize(embeddings)?;
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, bytes)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::info!(
            path = %self.path.display(),
            embeddings = embeddings.len(),
            "Saved embedding cache"
        );

        Ok(())
    }
}
