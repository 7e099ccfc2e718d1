use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A made-up show written by the concept writer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowConcept {
    pub title: String,
    pub description: String,
}

impl ShowConcept {
    /// Prompt sent to the image provider for this concept's cover art
    pub fn cover_art_prompt(&self) -> String {
        format!(
            "TV show cover art for \"{}\": {}",
            self.title, self.description
        )
    }

    /// File-system friendly version of the title
    pub fn slug(&self) -> String {
        let slug = self
            .title
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        if slug.is_empty() {
            "untitled".to_string()
        } else {
            slug
        }
    }
}

/// A fictional show together with the titles it was inspired by
#[derive(Debug, Clone, PartialEq)]
pub struct FictionalShow {
    pub concept: ShowConcept,
    pub based_on: Vec<String>,
    /// Where the cover art was saved, if it could be generated
    pub poster: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        let concept = ShowConcept {
            title: "Dragons & Detectives: The Reckoning!".to_string(),
            description: String::new(),
        };
        assert_eq!(concept.slug(), "dragons-detectives-the-reckoning");
    }

    #[test]
    fn test_slug_of_symbol_only_title() {
        let concept = ShowConcept {
            title: "???".to_string(),
            description: String::new(),
        };
        assert_eq!(concept.slug(), "untitled");
    }

    #[test]
    fn test_cover_art_prompt_mentions_title_and_description() {
        let concept = ShowConcept {
            title: "Cold Case Kingdom".to_string(),
            description: "A medieval detective solves crimes.".to_string(),
        };
        let prompt = concept.cover_art_prompt();
        assert!(prompt.contains("Cold Case Kingdom"));
        assert!(prompt.contains("A medieval detective solves crimes."));
    }
}
