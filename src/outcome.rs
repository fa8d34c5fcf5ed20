//! Interpreting the conversion server's reply.
//!
//! The server answers in one of two shapes: a 2xx status with the file as the
//! body, or a non-2xx status with a JSON `{"error": "..."}` body. Both become a
//! [`ConversionOutcome`]. A body that cannot be read at all, or an error body
//! that is not JSON, is a transport failure and surfaces as `Err`.

use crate::disposition::resolve_filename;
use crate::error::ClientError;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// Result of one conversion, consumed once by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The server produced a file.
    Success { file_bytes: Vec<u8>, filename: String },
    /// The server refused; `message` is ready to show.
    Failure { message: String },
}

/// Turn an HTTP response into an outcome.
///
/// `default_filename` is used when `Content-Disposition` is missing or
/// yields no name.
pub async fn interpret_response(
    response: Response,
    default_filename: &str,
) -> Result<ConversionOutcome, ClientError> {
    let status = response.status();
    let url = response.url().to_string();

    if status.is_success() {
        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let filename = resolve_filename(disposition.as_deref(), default_filename);

        let file_bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport {
                url: url.clone(),
                reason: format!("failed to read response body: {e}"),
            })?
            .to_vec();

        if !file_bytes.starts_with(b"%PDF") {
            warn!(
                "Payload for {} does not look like a PDF ({} bytes)",
                filename,
                file_bytes.len()
            );
        }
        debug!("HTTP {}: {} bytes as '{}'", status, file_bytes.len(), filename);

        return Ok(ConversionOutcome::Success {
            file_bytes,
            filename,
        });
    }

    let body = response.bytes().await.map_err(|e| ClientError::Transport {
        url: url.clone(),
        reason: format!("failed to read error body: {e}"),
    })?;
    let error = server_error(status, &body).map_err(|reason| ClientError::Transport {
        url,
        reason,
    })?;
    debug!("HTTP {}: {}", status, error);

    Ok(ConversionOutcome::Failure {
        message: error.user_message(),
    })
}

/// Decode a non-2xx body into [`ClientError::ServerReported`].
///
/// `Err` carries the decoding failure when the body is not JSON.
fn server_error(status: StatusCode, body: &[u8]) -> Result<ClientError, String> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|e| format!("HTTP {status} with a non-JSON error body: {e}"))?;
    Ok(ClientError::ServerReported {
        status: status.as_u16(),
        message: json.get("error").and_then(error_text),
    })
}

/// Text for the `error` field, or `None` when it carries nothing to show.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
