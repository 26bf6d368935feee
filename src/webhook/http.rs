//! Request/response value types and transport traits.

use std::time::Duration;

use url::Url;

use super::HttpError;

/// A file slot attached to a webhook message.
///
/// The slot key is derived from the filename (prefixed with `_`) so it
/// can never collide with the reserved `payload_json` multipart slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart slot name.
    pub slot: String,
    /// Filename reported to the server.
    pub filename: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Creates a file slot for `filename` carrying `bytes`.
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            slot: format!("_{filename}"),
            filename,
            bytes,
        }
    }
}

/// The body of an outbound webhook request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body (delete).
    Empty,
    /// A JSON body (send/edit without files).
    Json(serde_json::Value),
    /// Multipart: one `payload_json` part plus one part per file slot.
    Multipart {
        /// The serialized payload mapping, as a JSON string.
        payload_json: String,
        /// File parts in slot order.
        files: Vec<FilePart>,
    },
}

/// An outbound webhook request.
///
/// Clonable so the rate-limit loop can resubmit the identical request.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Target URL.
    pub url: Url,
    /// Query parameters (`wait`, `thread_id`).
    pub query: Vec<(&'static str, String)>,
    /// Request body.
    pub body: RequestBody,
    /// Per-request timeout, if configured.
    pub timeout: Option<Duration>,
}

impl WebhookRequest {
    /// Creates a request with no query, no body and no timeout.
    #[must_use]
    pub const fn new(method: http::Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }
}

/// A fully-buffered webhook response.
#[derive(Debug, Clone)]
pub struct WebhookResponse {
    /// HTTP status code.
    pub status: http::StatusCode,
    /// Response headers.
    pub headers: http::HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl WebhookResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// True for the two statuses the endpoint uses for confirmed
    /// delivery: 200 and 204.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(
            self.status,
            http::StatusCode::OK | http::StatusCode::NO_CONTENT
        )
    }

    /// Returns the body as UTF-8, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Parses the body as JSON. Best-effort: malformed bodies yield `None`.
    #[must_use]
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Async transport for webhook requests.
///
/// Abstracts the HTTP client so tests can inject mocks and so the
/// caller can supply its own long-lived session (see
/// [`AsyncWebhook::execute_with`](super::AsyncWebhook::execute_with)).
pub trait Transport: Send + Sync {
    /// Sends the request and buffers the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be delivered at
    /// all; non-2xx statuses are NOT transport errors.
    fn send(
        &self,
        request: WebhookRequest,
    ) -> impl std::future::Future<Output = Result<WebhookResponse, HttpError>> + Send;
}

/// Blocking transport for webhook requests.
pub trait BlockingTransport: Send + Sync {
    /// Sends the request and buffers the response, blocking the caller.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be delivered at
    /// all; non-2xx statuses are NOT transport errors.
    fn send(&self, request: WebhookRequest) -> Result<WebhookResponse, HttpError>;
}
