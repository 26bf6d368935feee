//! Error types for webhook delivery.

use thiserror::Error;

/// Error type for HTTP transport failures.
///
/// Describes what went wrong at the network level without dictating
/// recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed (DNS, connection refused, TLS, ...).
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not respond within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request URL was rejected by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The proxy configuration was rejected by the transport.
    #[error("invalid proxy configuration: {0}")]
    Proxy(String),
}

/// Error type for webhook configuration and delivery.
///
/// Delivery failures (a terminal non-2xx status) are deliberately NOT
/// errors: the call returns the failing response for the caller to
/// inspect. Only configuration mistakes, transport failures, and
/// untrusted rate-limit signals raise.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No explicit id was supplied and none could be parsed from the URL.
    #[error("`id` was not passed and not parseable from the URL `{0}`")]
    IdNotParseable(String),

    /// The webhook id or URL was empty when an operation required it.
    #[error("webhook id and URL must be set before `{operation}`")]
    MissingId {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A 429 response without the routing marker header, or with an
    /// unreadable `retry_after` body. Untrusted, never retried.
    #[error("untrusted rate-limit response ({status}): {body}")]
    UntrustedRateLimit {
        /// Status code of the offending response.
        status: http::StatusCode,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The underlying transport failed.
    #[error(transparent)]
    Http(#[from] HttpError),
}
