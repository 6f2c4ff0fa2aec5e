use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhereIsItError {
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, WhereIsItError>;
