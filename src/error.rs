use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MjcError {
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Could not reach the compiler service: {0}")]
    Connectivity(String),

    #[error("Compilation failed: {0}")]
    Compilation(String),

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Invalid login input: {0}")]
    Validation(String),

    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Preference storage error: {0}")]
    Preferences(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shell completion error: {0}")]
    ShellCompletion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, MjcError>;
