use uuid::Uuid;

/// Correlation id for one recommendation round
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundId(pub Uuid);

impl RoundId {
    /// Creates a new random round ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the UUID as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RoundId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span that tags everything logged during a round with its ID
pub fn round_span(round_id: &RoundId) -> tracing::Span {
    tracing::info_span!("round", round_id = %round_id)
}
