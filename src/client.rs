//! HTTP client for the conversion endpoint.
//!
//! The only network I/O in the crate: one `POST` per attempt, no retries.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::request::ConversionRequest;
use reqwest::{Response, Url};
use std::time::Duration;
use tracing::debug;

/// A `reqwest::Client` bound to one conversion endpoint.
#[derive(Debug, Clone)]
pub struct ConvertClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ConvertClient {
    /// Build a client from a validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint = config.endpoint_url()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ClientError::Transport {
            url: endpoint.to_string(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send `{"url": ...}` as JSON.
    ///
    /// Any HTTP status is `Ok`; only a request that never completed is `Err`.
    pub async fn post_convert(&self, request: &ConversionRequest) -> Result<Response, ClientError> {
        debug!("POST {} for {}", self.endpoint, request.url());

        // `.json()` sets `Content-Type: application/json`.
        self.http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                url: self.endpoint.to_string(),
                reason: if e.is_timeout() {
                    format!("request timed out: {e}")
                } else if e.is_connect() {
                    format!("could not connect: {e}")
                } else {
                    e.to_string()
                },
            })
    }
}
