use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhenokbError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Commit error: {0}")]
    Commit(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session state error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PhenokbError>;
