use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::Instrument;

use crate::{
    error::AppResult,
    models::{FictionalShow, MatchResult},
    services::recommendations::get_recommendations,
};

use super::{round_span, AppState, RoundId};

/// Fewer resolved shows than this and the user is asked again
pub const MIN_LIKED_SHOWS: usize = 2;

const SHOWS_PROMPT: &str =
    "Which TV shows did you really like watching? Separate them by a slash '/'.";

/// Splits the raw answer on `/`, dropping blank entries
pub fn parse_show_list(line: &str) -> Vec<String> {
    line.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Interactive recommendation session over a line reader and a writer
///
/// The session ends after one round of recommendations has been shown, or
/// quietly when the input runs out.
pub struct Session<R, W> {
    state: AppState,
    lines: Lines<R>,
    output: W,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(state: AppState, input: R, output: W) -> Self {
        Self {
            state,
            lines: input.lines(),
            output,
        }
    }

    /// Gives back the writer, mostly so tests can inspect what was printed
    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run(&mut self) -> AppResult<()> {
        loop {
            self.say(SHOWS_PROMPT).await?;
            let Some(line) = self.read_line().await? else {
                break;
            };

            let Some(liked) = self.resolve(&line).await? else {
                continue;
            };

            self.say(&format!(
                "Just to make sure, do you mean: {}? (y/n)",
                liked.join(", ")
            ))
            .await?;
            let Some(answer) = self.read_line().await? else {
                break;
            };
            if !is_yes(&answer) {
                self.say("Sorry about that. Let's try again, please make sure to write the names of the TV shows correctly.")
                    .await?;
                continue;
            }

            let round_id = RoundId::new();
            match self.play_round(&liked).instrument(round_span(&round_id)).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(round_id = %round_id, error = %e, "Round abandoned");
                    self.say("Sorry, I couldn't find recommendations for those shows. Let's try again.")
                        .await?;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!("Input closed, ending session");
        Ok(())
    }

    /// Resolves the answer to catalog titles, or explains why it can't
    async fn resolve(&mut self, line: &str) -> AppResult<Option<Vec<String>>> {
        let inputs = parse_show_list(line);
        let liked = match self.state.resolver.resolve_any(&inputs) {
            Ok(liked) => liked,
            Err(e) if e.is_retryable() => {
                tracing::info!(entered = inputs.len(), "No shows recognised");
                self.say("Sorry, none of those shows are in the catalog. Please check the spelling and try again.")
                    .await?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if liked.len() >= MIN_LIKED_SHOWS {
            return Ok(Some(liked));
        }

        tracing::info!(entered = inputs.len(), resolved = liked.len(), "Not enough shows recognised");
        self.say(&format!(
            "Sorry, I recognised {} of the shows you entered. Please enter at least {} TV shows from the catalog.",
            liked.len(),
            MIN_LIKED_SHOWS
        ))
        .await?;

        Ok(None)
    }

    async fn play_round(&mut self, liked: &[String]) -> AppResult<()> {
        tracing::info!(liked = ?liked, "Round started");
        self.say("Great! Generating recommendations now…").await?;

        let recommendations = get_recommendations(
            liked,
            &self.state.embeddings,
            self.state.recommendation_count,
        )?;
        self.print_recommendations(&recommendations).await?;

        if let Some(studio) = &self.state.studio {
            let recommended: Vec<String> =
                recommendations.iter().map(|r| r.title.clone()).collect();
            let shows = studio.create(liked, &recommended).await;
            self.print_fictional_shows(&shows).await?;
        }

        Ok(())
    }

    async fn print_recommendations(&mut self, recommendations: &[MatchResult]) -> AppResult<()> {
        if recommendations.is_empty() {
            return self.say("The catalog has no other shows to recommend.").await;
        }

        self.say("Here are the TV shows that I think you would love:").await?;
        for recommendation in recommendations {
            self.say(&recommendation.to_string()).await?;
        }
        Ok(())
    }

    async fn print_fictional_shows(&mut self, shows: &[FictionalShow]) -> AppResult<()> {
        if shows.is_empty() {
            return Ok(());
        }

        self.say("I have also created just for you some shows which I think you would love.")
            .await?;
        for (number, show) in shows.iter().enumerate() {
            self.say(&format!(
                "Show #{} is based on {}. Its name is {} and it is about: {}",
                number + 1,
                show.based_on.join(", "),
                show.concept.title,
                show.concept.description
            ))
            .await?;

            if let Some(poster) = &show.poster {
                self.say(&format!("Cover art saved to {}", poster.display()))
                    .await?;
            }
        }
        Ok(())
    }

    async fn read_line(&mut self) -> AppResult<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    async fn say(&mut self, text: &str) -> AppResult<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }
}
