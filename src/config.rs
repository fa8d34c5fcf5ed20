//! Configuration for talking to the conversion server.
//!
//! Every knob lives in [`ClientConfig`], built via [`ClientConfigBuilder`].
//! Callers set only what they care about and inherit the defaults for the
//! rest: a local conversion server, the `/convert` endpoint and the Gemini
//! share-link prefix.

use crate::error::ClientError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Share links must start with this prefix to be sent to the server.
pub const DEFAULT_SHARE_PREFIX: &str = "https://g.co/gemini/share/";

/// Filename used when the response does not suggest one.
pub const DEFAULT_FILENAME: &str = "gemini-chat.pdf";

/// Origin of a conversion server running locally with its stock settings.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Path of the conversion endpoint on the server.
pub const DEFAULT_ENDPOINT_PATH: &str = "/convert";

/// Configuration for a [`crate::controller::ConversionController`].
///
/// # Example
/// ```rust
/// use gemini_share_pdf::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8080")
///     .request_timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint_url().unwrap().as_str(), "http://localhost:8080/convert");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the conversion server. Default: `http://127.0.0.1:5000`.
    pub base_url: String,

    /// Endpoint path joined onto `base_url`. Default: `/convert`.
    pub endpoint_path: String,

    /// Required prefix for submitted links. Default: `https://g.co/gemini/share/`.
    pub share_prefix: String,

    /// Download name when `Content-Disposition` yields nothing. Default: `gemini-chat.pdf`.
    pub default_filename: String,

    /// Whole-request timeout in seconds. Default: none.
    ///
    /// Conversions render a full chat to PDF server-side and can take a long
    /// time. With no timeout a hung request keeps the UI busy until the
    /// connection settles on its own.
    pub request_timeout_secs: Option<u64>,

    /// TCP connect timeout in seconds. Default: none.
    pub connect_timeout_secs: Option<u64>,

    /// `User-Agent` header sent with each request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            share_prefix: DEFAULT_SHARE_PREFIX.to_string(),
            default_filename: DEFAULT_FILENAME.to_string(),
            request_timeout_secs: None,
            connect_timeout_secs: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Absolute URL of the conversion endpoint.
    pub fn endpoint_url(&self) -> Result<Url, ClientError> {
        let base = parse_base_url(&self.base_url)?;
        base.join(&self.endpoint_path).map_err(|e| {
            ClientError::InvalidConfig(format!(
                "cannot join '{}' onto '{}': {e}",
                self.endpoint_path, self.base_url
            ))
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw)
        .map_err(|e| ClientError::InvalidConfig(format!("base URL '{raw}' is not a URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidConfig(format!(
            "base URL must use http or https, got '{other}'"
        ))),
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.config.endpoint_path = path.into();
        self
    }

    pub fn share_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.share_prefix = prefix.into();
        self
    }

    pub fn default_filename(mut self, name: impl Into<String>) -> Self {
        self.config.default_filename = name.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let c = &self.config;
        parse_base_url(&c.base_url)?;
        if !c.endpoint_path.starts_with('/') {
            return Err(ClientError::InvalidConfig(format!(
                "endpoint path must start with '/', got '{}'",
                c.endpoint_path
            )));
        }
        if c.share_prefix.is_empty() {
            return Err(ClientError::InvalidConfig(
                "share prefix must not be empty".into(),
            ));
        }
        if c.default_filename.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "default filename must not be empty".into(),
            ));
        }
        for (name, value) in [
            ("request timeout", c.request_timeout_secs),
            ("connect timeout", c.connect_timeout_secs),
        ] {
            if value == Some(0) {
                return Err(ClientError::InvalidConfig(format!(
                    "{name} must be ≥ 1 second"
                )));
            }
        }
        Ok(self.config)
    }
}
