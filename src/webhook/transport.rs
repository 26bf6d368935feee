//! Production transports backed by reqwest.
//!
//! One async, one blocking; both are thin wrappers that translate
//! [`WebhookRequest`] into a reqwest request and buffer the reply.

use super::config::Proxies;
use super::http::{BlockingTransport, RequestBody, Transport, WebhookRequest, WebhookResponse};
use super::HttpError;

fn map_send_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}

fn map_proxy_error(e: reqwest::Error) -> HttpError {
    HttpError::Proxy(e.to_string())
}

/// Async transport using `reqwest::Client`.
///
/// [`new`](Self::new) inherits reqwest's defaults (connection pooling,
/// rustls). [`with_proxies`](Self::with_proxies) builds a client scoped
/// to one webhook's proxy configuration.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Wraps an existing reqwest client. Lifetime and connection reuse
    /// stay the caller's responsibility.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    /// Builds a transport honoring the given proxy configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Proxy`] for unusable proxy URLs.
    pub fn with_proxies(proxies: Option<&Proxies>) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxies) = proxies {
            if let Some(url) = &proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(url).map_err(map_proxy_error)?);
            }
            if let Some(url) = &proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(url).map_err(map_proxy_error)?);
            }
        }
        let inner = builder
            .build()
            .map_err(|e| HttpError::Connection(Box::new(e)))?;
        Ok(Self { inner })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: WebhookRequest) -> Result<WebhookResponse, HttpError> {
        let mut builder = self
            .inner
            .request(request.method, request.url.as_str())
            .query(&request.query);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(payload) => builder.json(&payload),
            RequestBody::Multipart {
                payload_json,
                files,
            } => {
                let mut form = reqwest::multipart::Form::new().text("payload_json", payload_json);
                for file in files {
                    let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.filename);
                    form = form.part(file.slot, part);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        Ok(WebhookResponse::new(status, headers, body))
    }
}

/// Blocking transport using `reqwest::blocking::Client`.
///
/// Must not be used from inside an async runtime; that is what
/// [`ReqwestTransport`] is for.
#[derive(Debug, Clone)]
pub struct BlockingReqwestTransport {
    inner: reqwest::blocking::Client,
}

impl BlockingReqwestTransport {
    /// Creates a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::blocking::Client::new(),
        }
    }

    /// Wraps an existing blocking reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { inner: client }
    }

    /// Builds a transport honoring the given proxy configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Proxy`] for unusable proxy URLs.
    pub fn with_proxies(proxies: Option<&Proxies>) -> Result<Self, HttpError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(proxies) = proxies {
            if let Some(url) = &proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(url).map_err(map_proxy_error)?);
            }
            if let Some(url) = &proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(url).map_err(map_proxy_error)?);
            }
        }
        let inner = builder
            .build()
            .map_err(|e| HttpError::Connection(Box::new(e)))?;
        Ok(Self { inner })
    }
}

impl Default for BlockingReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockingTransport for BlockingReqwestTransport {
    fn send(&self, request: WebhookRequest) -> Result<WebhookResponse, HttpError> {
        let mut builder = self
            .inner
            .request(request.method, request.url.as_str())
            .query(&request.query);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(payload) => builder.json(&payload),
            RequestBody::Multipart {
                payload_json,
                files,
            } => {
                let mut form =
                    reqwest::blocking::multipart::Form::new().text("payload_json", payload_json);
                for file in files {
                    let part = reqwest::blocking::multipart::Part::bytes(file.bytes)
                        .file_name(file.filename);
                    form = form.part(file.slot, part);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        Ok(WebhookResponse::new(status, headers, body))
    }
}
