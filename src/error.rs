use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transformation failed: {0}")]
    Transformation(String),

    #[error("load failed: {0}")]
    Load(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
