use thiserror::Error;

/// Core error type shared across schemafix crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The model violates structural invariants.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// Convenience alias for results returned by schemafix crates.
pub type Result<T> = std::result::Result<T, Error>;
