use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScopeError>;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("invalid scope pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
