use crate::services::providers::ProviderError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing credential: {0} not found")]
    MissingCredential(&'static str),

    #[error("None of the entered shows matched the catalog")]
    NoTitleMatch,

    #[error("No embeddings available for the selected shows")]
    NoEmbeddingsAvailable,

    #[error("Embedding for '{title}' has dimension {got}, expected {expected}")]
    DimensionMismatch {
        title: String,
        expected: usize,
        got: usize,
    },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    CacheSerialization(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Image generation for order {order_id} timed out after {attempts} attempts")]
    GenerationTimeout { order_id: String, attempts: u32 },

    #[error("Image generation failed for order {0}")]
    GenerationFailed(String),
}

impl AppError {
    /// Whether the user should simply be asked to try again
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::NoTitleMatch | AppError::NoEmbeddingsAvailable)
    }
}

impl From<bincode::Error> for AppError {
    fn from(err: bincode::Error) -> Self {
        AppError::CacheSerialization(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
