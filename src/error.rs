//! Error types for the gemini-share-pdf library.
//!
//! Failures fall into distinct families, and each one reaches the user in a
//! different way:
//!
//! * [`ValidationError`]: the pasted text was rejected before any network
//!   call. Recovered locally with a specific message; never logged.
//!
//! * [`ClientError::ServerReported`]: the conversion server answered with a
//!   non-2xx status and a JSON `{"error": ...}` body. The server's message is
//!   shown to the user, prefixed with `Error:`.
//!
//! * [`ClientError::Transport`]: the request never completed or its body
//!   could not be decoded. The user only sees a generic network message; the
//!   underlying cause goes to the log.
//!
//! None of these are retried. Every failure is terminal for its attempt.

use std::path::PathBuf;
use thiserror::Error;

/// User-facing text for a transport failure. Raw causes are never shown.
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred. Is the server running?";

/// Fallback used when an error body carries no usable `error` field.
pub const GENERIC_SERVER_ERROR: &str = "Something went wrong.";

/// Shown when the download target could not store the payload.
pub const DOWNLOAD_ERROR_MESSAGE: &str = "Error: Could not save the downloaded file.";

/// Rejections raised while checking the pasted share link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing left after trimming.
    #[error("Please paste a URL first.")]
    EmptyInput,

    /// Text does not start with the share-link prefix.
    #[error("Please enter a valid Gemini share link.")]
    InvalidShareLink,
}

/// All errors returned by the gemini-share-pdf library.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Input errors ──────────────────────────────────────────────────────
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Server errors ─────────────────────────────────────────────────────
    /// Non-2xx response whose body was JSON.
    ///
    /// `message` is `None` when the body had no usable `error` field.
    #[error("Server returned HTTP {status}: {}", .message.as_deref().unwrap_or(GENERIC_SERVER_ERROR))]
    ServerReported {
        status: u16,
        message: Option<String>,
    },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The request did not complete, or its body could not be decoded.
    #[error("Transport failure talking to '{url}': {reason}")]
    Transport { url: String, reason: String },

    // ── Download errors ───────────────────────────────────────────────────
    /// The download target could not store the file.
    #[error("Failed to save download to '{path}': {source}")]
    DownloadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// The text shown in the message area for this error.
    ///
    /// Transport details collapse into
    /// [`NETWORK_ERROR_MESSAGE`]; the full error is only for logs.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(v) => v.to_string(),
            ClientError::ServerReported { message, .. } => format!(
                "Error: {}",
                message.as_deref().unwrap_or(GENERIC_SERVER_ERROR)
            ),
            ClientError::Transport { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            ClientError::DownloadFailed { .. } => DOWNLOAD_ERROR_MESSAGE.to_string(),
            ClientError::InvalidConfig(msg) => format!("Error: {msg}"),
        }
    }
}
