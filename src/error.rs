//! Error types for the BlockEx Trade API client.
//!
//! This module provides a single error type covering all failure modes of
//! the client, from transport errors to authentication failures to
//! rejected endpoint calls.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for BlockEx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all BlockEx Trade API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the transport level. Surfaced unchanged;
    /// transport errors are never retried or reinterpreted.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Query string serialization failed
    #[error("query string error: {0}")]
    Query(#[from] serde_html_form::ser::Error),

    /// A business endpoint returned a non-success response that is not an
    /// authorization rejection.
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Detail extracted from the response body (`error` field,
        /// falling back to `message`)
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// The token endpoint rejected the supplied credentials, or a login
    /// performed on behalf of an authorized call failed.
    #[error("login failed: {0}")]
    Authentication(String),

    /// The logout endpoint rejected the request. The session token is
    /// preserved so the caller's view of authentication state stays
    /// consistent with the server's.
    #[error("logout failed: {0}")]
    Logout(String),

    /// Malformed caller input (e.g. an unsupported HTTP method).
    /// Non-retryable; no network call was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::Logout(_))
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input or a 4xx endpoint response).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => (400..500).contains(status),
            Error::InvalidInput(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// HTTP status carried by this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
