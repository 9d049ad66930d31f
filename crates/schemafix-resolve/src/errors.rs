use std::path::PathBuf;

use thiserror::Error;

/// Errors raised around the resolver: settings loading and model checks.
///
/// Inference itself is total and never fails.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),
    #[error(transparent)]
    Model(#[from] schemafix_core::Error),
}

/// Result type for resolver operations that can fail.
pub type Result<T> = std::result::Result<T, ResolveError>;
