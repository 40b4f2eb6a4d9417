use thiserror::Error;

/// Top-level error type for the botforge runtime.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("cannot create '{command}' command: {message}")]
    Registration { command: String, message: String },

    #[error("cannot delete '{command}' command: {message}")]
    Teardown { command: String, message: String },

    #[error("session not open: {0}")]
    NotConnected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
