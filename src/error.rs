use thiserror::Error;

/// Problems detected while building the service at startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("prompt template is missing the `{0}` placeholder")]
    MissingPlaceholder(&'static str),

    #[error("prompt template contains the `{0}` placeholder more than once")]
    DuplicatePlaceholder(&'static str),

    #[error("invalid backend url `{url}`: {reason}")]
    InvalidBackendUrl { url: String, reason: String },
}

/// A failed call to the generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation backend failed: {0}")]
    Backend(String),

    #[error("generation backend timed out after {0} seconds")]
    TimedOut(u64),
}
