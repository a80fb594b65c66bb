use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
