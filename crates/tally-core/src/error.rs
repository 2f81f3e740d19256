//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Store error ({status}): {message}")]
    Store { status: u16, message: String },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
