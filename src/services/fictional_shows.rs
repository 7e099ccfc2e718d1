use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    models::{FictionalShow, ShowConcept},
    services::providers::{ConceptWriter, ImageProvider, LightxClient, OpenAiClient},
};

/// Invents shows from a set of titles and commissions their cover art
///
/// Nothing here can fail the caller: a concept that cannot be written is
/// skipped, and cover art that cannot be generated leaves `poster` empty.
pub struct FictionalShowStudio {
    writer: Arc<dyn ConceptWriter>,
    artist: Option<Arc<dyn ImageProvider>>,
    output_dir: PathBuf,
}

impl FictionalShowStudio {
    pub fn new(
        writer: Arc<dyn ConceptWriter>,
        artist: Option<Arc<dyn ImageProvider>>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            writer,
            artist,
            output_dir: output_dir.into(),
        }
    }

    /// Requires an OpenAI key; cover art is only requested when a LightX key is set
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let writer = Arc::new(OpenAiClient::from_config(config)?);

        let artist = match LightxClient::from_config(config) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn ImageProvider>),
            Err(e) => {
                tracing::info!(error = %e, "Cover art disabled");
                None
            }
        };

        Ok(Self::new(writer, artist, &config.image_output_dir))
    }

    /// Writes one show inspired by the liked titles and one inspired by the
    /// recommendations
    pub async fn create(&self, liked: &[String], recommended: &[String]) -> Vec<FictionalShow> {
        let mut shows = Vec::with_capacity(2);

        for (number, seeds) in [liked, recommended].into_iter().enumerate() {
            if let Some(show) = self.create_one(number + 1, seeds).await {
                shows.push(show);
            }
        }

        shows
    }

    async fn create_one(&self, number: usize, seeds: &[String]) -> Option<FictionalShow> {
        if seeds.is_empty() {
            tracing::debug!(show = number, "No seed titles, skipping fictional show");
            return None;
        }

        let concept = match self.writer.write_concept(seeds).await {
            Ok(concept) => concept,
            Err(e) => {
                tracing::warn!(show = number, error = %e, "Failed to write show concept");
                return None;
            }
        };

        let poster = match &self.artist {
            Some(artist) => match self.render_poster(artist.as_ref(), number, &concept).await {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(show = number, title = %concept.title, error = %e, "Cover art unavailable");
                    None
                }
            },
            None => None,
        };

        Some(FictionalShow {
            concept,
            based_on: seeds.to_vec(),
            poster,
        })
    }

    async fn render_poster(
        &self,
        artist: &dyn ImageProvider,
        number: usize,
        concept: &ShowConcept,
    ) -> AppResult<PathBuf> {
        let bytes = artist.generate(&concept.cover_art_prompt()).await?;

        let path = poster_path(&self.output_dir, number, concept);
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Cover art saved");

        Ok(path)
    }
}

fn poster_path(dir: &Path, number: usize, concept: &ShowConcept) -> PathBuf {
    dir.join(format!("show-{}-{}.jpg", number, concept.slug()))
}
