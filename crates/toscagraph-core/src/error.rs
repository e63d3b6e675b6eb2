use crate::Identifier;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToscaGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Query template error: {0}")]
    Template(String),

    #[error("Missing binding: {0}")]
    MissingBinding(String),

    #[error("Unexpected term for {variable}: expected {expected}")]
    UnexpectedTerm {
        variable: String,
        expected: &'static str,
    },

    #[error("Cycle detected in parameter tree at {0}")]
    CycleDetected(Identifier),

    #[error("Malformed template token: {0}")]
    MalformedToken(String),

    #[error("Invalid optimization label: {0}")]
    InvalidLabel(String),

    #[error("Timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ToscaGraphError>;
