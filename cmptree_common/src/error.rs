use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmpTreeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid relative path: {0}")]
    InvalidRelativePath(String),

    #[error("Comparison error: {0}")]
    Comparison(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CmpTreeError>;
