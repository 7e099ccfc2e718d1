use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OpenAI API key, used for embeddings and show concepts
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Model used to embed catalog descriptions
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Model used to write fictional show concepts
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// LightX API key, used for cover art
    #[serde(default)]
    pub lightx_api_key: Option<String>,

    /// LightX API base URL
    #[serde(default = "default_lightx_api_url")]
    pub lightx_api_url: String,

    /// CSV file with `Title` and `Description` columns
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Location of the embedding cache
    #[serde(default = "default_embeddings_path")]
    pub embeddings_path: String,

    /// Directory cover art is written to
    #[serde(default = "default_image_output_dir")]
    pub image_output_dir: String,

    /// Number of recommendations shown per round
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_lightx_api_url() -> String {
    "https://api.lightxeditor.com/external/api".to_string()
}

fn default_catalog_path() -> String {
    "imdb_tvshows.csv".to_string()
}

fn default_embeddings_path() -> String {
    "embeddings/embeddings.bin".to_string()
}

fn default_image_output_dir() -> String {
    "generated_images".to_string()
}

fn default_recommendation_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .validate()
    }

    /// Build configuration from explicit key/value pairs
    ///
    /// Uses the same field names and defaults as [`Config::from_env`].
    pub fn from_pairs<I>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(pairs)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .validate()
    }

    fn validate(self) -> anyhow::Result<Self> {
        anyhow::ensure!(
            self.recommendation_count > 0,
            "Failed to load config: RECOMMENDATION_COUNT must be at least 1"
        );
        Ok(self)
    }
}
