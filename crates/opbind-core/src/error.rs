use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A host value could not be represented as a dynamic value.
    #[error("Value conversion error: {0}")]
    Value(String),

    #[error("Dependency graph error: {0}")]
    Graph(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Value(e.to_string())
    }
}
