use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot collect posts from {path}: {message}")]
    Collection { path: PathBuf, message: String },

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("TOML parse error in {path}: {message}")]
    TomlParse { path: PathBuf, message: String },

    #[error("YAML parse error in {path}: {message}")]
    YamlParse { path: PathBuf, message: String },

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Invalid frontmatter in file: {path}")]
    InvalidFrontmatter { path: PathBuf },

    #[error("Missing required field '{field}' in file: {path}")]
    MissingField { field: String, path: PathBuf },

    #[error("Invalid date '{value}' in file: {path}")]
    InvalidDate { value: String, path: PathBuf },

    #[error("Cannot serialize feed: {message}")]
    Serialization { message: String },

    #[error("Duplicate feed link '{link}' in {path} conflicts with {existing_path}")]
    DuplicateLink {
        link: String,
        path: PathBuf,
        existing_path: PathBuf,
    },
}

impl FeedError {
    pub(crate) fn collection(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Collection {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
