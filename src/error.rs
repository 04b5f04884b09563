// ABOUTME: Error types with structured exit codes for CLI
// ABOUTME: Separates codec, transport and filesystem failures for reporting

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status} on {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("post '{0}' not found")]
    NotFound(String),

    #[error("server rejected request: {0}")]
    Logical(String),

    #[error("post missing '{0}' attribute")]
    MissingField(&'static str),

    #[error("post contains invalid date format '{0}' should be in 'YYYY-MM-DD' format")]
    InvalidDate(String),

    #[error("Frontmatter error: {0}")]
    Frontmatter(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Editor error: {0}")]
    Editor(String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Network(_) => 3,
            Error::Api { .. } => 4,
            Error::NotFound(_) => 5,
            Error::Logical(_) => 6,
            Error::MissingField(_) | Error::InvalidDate(_) | Error::Frontmatter(_) => 7,
            Error::Parse(_) => 8,
            Error::Filesystem(_) => 9,
            Error::Editor(_) => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
