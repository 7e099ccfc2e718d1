/// OpenAI API provider
///
/// Provides description embeddings (`/embeddings`) and fictional show concepts
/// (`/chat/completions` in JSON mode).
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ShowConcept,
    services::providers::{ConceptWriter, EmbeddingProvider, ProviderError},
};
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

const CONCEPT_SYSTEM_PROMPT: &str = "You invent TV shows. Reply only with a JSON object \
with the keys \"title\" and \"description\".";

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    embedding_model: String,
    chat_model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        api_url: String,
        embedding_model: String,
        chat_model: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            embedding_model,
            chat_model,
        }
    }

    /// Creates a client from configuration, failing if no API key is set
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AppError::MissingCredential("OPENAI_API_KEY"))?;

        Ok(Self::new(
            api_key,
            config.openai_api_url.clone(),
            config.embedding_model.clone(),
            config.chat_model.clone(),
        ))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(response = %text, "Unparseable OpenAI response");
            ProviderError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request = EmbeddingRequest {
            input: text,
            model: &self.embedding_model,
        };

        let response: EmbeddingResponse = self.post_json("/embeddings", &request).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse("empty embedding".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[async_trait::async_trait]
impl ConceptWriter for OpenAiClient {
    async fn write_concept(&self, seed_titles: &[String]) -> Result<ShowConcept, ProviderError> {
        let request = json!({
            "model": self.chat_model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": CONCEPT_SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Invent a new TV show that fans of these shows would love: {}. \
                         Give it a catchy title and a two-sentence description.",
                        seed_titles.join(", ")
                    ),
                },
            ],
        });

        let response: ChatResponse = self.post_json("/chat/completions", &request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("empty completion".to_string()))?;

        let concept: ShowConcept = serde_json::from_str(&content)
            .map_err(|e| ProviderError::InvalidResponse(format!("bad concept JSON: {}", e)))?;

        tracing::info!(
            title = %concept.title,
            seeds = seed_titles.len(),
            provider = "openai",
            "Show concept written"
        );

        Ok(concept)
    }
}
