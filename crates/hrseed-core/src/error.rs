use thiserror::Error;

/// Core error type shared across hrseed crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A table was looked up that the catalog does not describe.
    #[error("unknown table: {0}")]
    UnknownTable(String),
    /// The foreign-key graph cannot be ordered.
    #[error("foreign key cycle between: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

/// Convenience alias for results returned by hrseed crates.
pub type Result<T> = std::result::Result<T, Error>;
