//! Validation of redirect targets.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Longest target URL accepted.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur while checking a target URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("URL is required")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

impl From<TargetUrlError> for AppError {
    fn from(err: TargetUrlError) -> Self {
        AppError::bad_request(
            "Validation failed",
            json!({ "url": err.to_string() }),
        )
    }
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// Returns the input with surrounding whitespace removed. The URL is stored
/// and redirected to exactly as the client wrote it, so `https://example.com`
/// does not gain a trailing slash.
///
/// Rejects `javascript:`, `data:`, `file:` and every other non-HTTP scheme.
/// Rejects embedded control characters: the URL parser silently drops tabs
/// and newlines, but the stored value must be usable as a `Location` header.
pub fn validate_target_url(input: &str) -> Result<String, TargetUrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(TargetUrlError::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(TargetUrlError::TooLong);
    }
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(TargetUrlError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(TargetUrlError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(TargetUrlError::MissingHost),
    }
}
