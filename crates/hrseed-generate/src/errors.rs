use thiserror::Error;

/// Errors emitted while building or emitting a fixture.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The plan cannot produce a consistent fixture.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A row referenced an id its parent table never produced.
    #[error("referential integrity violation: {table}.{column} -> {id}")]
    ReferentialIntegrity {
        table: String,
        column: String,
        id: String,
    },
    /// A finished graph broke one of its own invariants.
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] hrseed_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
