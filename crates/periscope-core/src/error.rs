use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Search in source '{source_title}' failed: {reason}")]
    SourceSearchFailed { source_title: String, reason: String },

    #[error("Action of result '{id}' failed: {reason}")]
    ActionFailed { id: String, reason: String },

    #[error("Runtime unavailable: {0}")]
    Runtime(String),
}

impl Error {
    pub fn search_failed(source_title: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::SourceSearchFailed { source_title: source_title.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
