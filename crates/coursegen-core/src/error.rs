use thiserror::Error;

/// Core error type shared across coursegen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The generator configuration cannot produce a dataset.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A generated dataset violates a hard invariant.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by coursegen crates.
pub type Result<T> = std::result::Result<T, Error>;
