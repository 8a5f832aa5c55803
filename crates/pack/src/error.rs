use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackError>;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
