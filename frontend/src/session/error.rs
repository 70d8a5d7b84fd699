use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write `{key}` to session storage: {message}")]
    Write { key: String, message: String },
}
