use thiserror::Error;

/// Outcome of a failed provider request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    #[error("provider server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("provider rejected request: {0}")]
    Permanent(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("giving up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::RateLimited(_) | FetchError::Server { .. } | FetchError::Transport(_)
        )
    }
}
