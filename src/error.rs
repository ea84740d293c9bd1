use chrono::{DateTime, Utc};
use thiserror::Error;

/// Reset timestamps are rendered without offset; callers append "UTC".
pub const RESET_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "GitHub rate limit exceeded: {remaining} / {limit}. Try again after {} UTC.",
        .reset.format(RESET_FORMAT)
    )]
    QuotaExhausted {
        remaining: u32,
        limit: u32,
        reset: DateTime<Utc>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("GitHub API error ({code}, HTTP {status}): {message}")]
    Api {
        code: String,
        status: u16,
        message: String,
    },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Api { code, .. } => code == "not_found",
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
