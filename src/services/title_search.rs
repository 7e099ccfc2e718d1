use crate::{
    error::{AppError, AppResult},
    models::Catalog,
    services::fuzzy,
};

/// Minimum fuzzy score (0–100) for an input to count as a catalog title
pub const MATCH_THRESHOLD: u8 = 80;

/// Best catalog title for one piece of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub title: String,
    pub score: u8,
}

/// Matches free-text show names against the catalog titles
///
/// Catalog titles are normalized once up front; each lookup scores the input
/// against every title and keeps the best. Ties go to the earliest title.
pub struct TitleResolver {
    titles: Vec<(String, String)>,
}

impl TitleResolver {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles = titles
            .into_iter()
            .map(|t| {
                let title: String = t.into();
                let processed = fuzzy::process(&title);
                (title, processed)
            })
            .collect();

        Self { titles }
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.titles())
    }

    /// Highest scoring catalog title, regardless of threshold
    pub fn best_match(&self, input: &str) -> Option<TitleMatch> {
        let query = fuzzy::process(input);
        let mut best: Option<TitleMatch> = None;

        for (title, processed) in &self.titles {
            let score = fuzzy::weighted_ratio_processed(&query, processed);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(TitleMatch {
                    title: title.clone(),
                    score,
                });
                if score == 100 {
                    break;
                }
            }
        }

        best
    }

    /// Resolves each input to a catalog title, dropping inputs scoring below
    /// [`MATCH_THRESHOLD`]
    ///
    /// Output order follows input order. Duplicates are kept.
    pub fn resolve<S: AsRef<str>>(&self, raw_inputs: &[S]) -> Vec<String> {
        raw_inputs
            .iter()
            .filter_map(|input| {
                let input = input.as_ref();
                let candidate = self.best_match(input);

                tracing::debug!(
                    input = %input,
                    candidate = ?candidate.as_ref().map(|m| m.title.as_str()),
                    score = candidate.as_ref().map_or(0, |m| m.score),
                    "Fuzzy title match"
                );

                candidate
                    .filter(|m| m.score >= MATCH_THRESHOLD)
                    .map(|m| m.title)
            })
            .collect()
    }

    /// Like [`TitleResolver::resolve`], but fails with `NoTitleMatch` when
    /// nothing at all could be resolved
    pub fn resolve_any<S: AsRef<str>>(&self, raw_inputs: &[S]) -> AppResult<Vec<String>> {
        let resolved = self.resolve(raw_inputs);
        if resolved.is_empty() {
            return Err(AppError::NoTitleMatch);
        }
        Ok(resolved)
    }
}

/// One-shot resolution of user inputs against a set of catalog titles
pub fn resolve_titles<S: AsRef<str>>(raw_inputs: &[S], catalog_titles: &[&str]) -> Vec<String> {
    TitleResolver::new(catalog_titles.iter().copied()).resolve(raw_inputs)
}
