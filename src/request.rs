//! The outbound conversion request and the share-link check guarding it.

use crate::error::ValidationError;
use serde::Serialize;

/// JSON body of `POST /convert`.
///
/// Only constructed through [`ConversionRequest::from_input`], so `url` is
/// always trimmed, non-empty and starts with the share prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    url: String,
}

impl ConversionRequest {
    /// Validate whatever text is in the URL field.
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. trimmed input is non-empty
    /// 2. trimmed input starts with `share_prefix`
    pub fn from_input(raw_input: &str, share_prefix: &str) -> Result<Self, ValidationError> {
        let url = raw_input.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        if !url.starts_with(share_prefix) {
            return Err(ValidationError::InvalidShareLink);
        }
        Ok(Self {
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
