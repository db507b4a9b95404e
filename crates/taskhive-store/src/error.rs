use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid storage key '{0}': {1}")]
    InvalidKey(String, String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
