use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid Exclude Pattern \"{pattern}\": {message}")]
    Pattern { pattern: String, message: String },

    #[error("Acquisition Error: Repository '{url}', Error: {message}")]
    Acquisition { url: String, message: String },

    #[error("Walk Error: Path '{path}', Error: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Run interrupted before completion")]
    Interrupted,
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let message = err.to_string();
        AppError::Walk { path, message }
    }
}
