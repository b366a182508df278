//! Error types for a single copy run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyError {
    /// Upstream answered with a non-success status.
    #[error("{endpoint} request failed: {status} - {body}")]
    Fetch {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    /// Connection, TLS or timeout failure before a status was received.
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Missing {0} environment variable. Set it in a .env file or export it in your shell.")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Order error: {0}")]
    Order(String),
}

impl CopyError {
    /// Whether this error belongs to the upstream read failure class.
    ///
    /// Timeouts and undecodable bodies abort a run exactly like a non-2xx status.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            CopyError::Fetch { .. } | CopyError::Transport(_) | CopyError::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CopyError>;
