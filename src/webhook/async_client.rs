//! The non-blocking webhook client.
//!
//! [`AsyncWebhook`] wraps [`Webhook`] and replaces only the suspension
//! mechanism: awaiting the HTTP response and awaiting the rate-limit
//! sleep. All payload building, reconciliation and housekeeping is the
//! wrapped client's, reached through `Deref`.

use std::ops::{Deref, DerefMut};

use crate::time::{Sleeper, TokioSleeper};

use super::client::Webhook;
use super::config::WebhookConfig;
use super::http::{Transport, WebhookResponse};
use super::ratelimit;
use super::transport::ReqwestTransport;
use super::WebhookError;

/// The async counterpart of [`Webhook`].
///
/// By default every operation acquires a transport session scoped to
/// that single call. Callers who want connection reuse across calls
/// pass their own session to the `*_with` methods; its lifetime is then
/// theirs to manage. No work runs in background tasks: everything
/// happens inside the awaited call chain, and cancellation is governed
/// by whatever the caller wraps around that chain plus the per-request
/// timeout.
///
/// # Example
///
/// ```no_run
/// use hookline::{AsyncWebhook, WebhookConfig};
///
/// # async fn example() -> Result<(), hookline::WebhookError> {
/// let mut webhook = AsyncWebhook::with_config(
///     "https://discord.com/api/webhooks/123456789/token",
///     WebhookConfig::new().with_content("hello"),
/// )?;
/// let response = webhook.execute(false).await?;
/// assert!(response.is_delivered());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AsyncWebhook {
    inner: Webhook,
}

impl Deref for AsyncWebhook {
    type Target = Webhook;

    fn deref(&self) -> &Webhook {
        &self.inner
    }
}

impl DerefMut for AsyncWebhook {
    fn deref_mut(&mut self) -> &mut Webhook {
        &mut self.inner
    }
}

impl From<Webhook> for AsyncWebhook {
    fn from(inner: Webhook) -> Self {
        Self { inner }
    }
}

impl AsyncWebhook {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::IdNotParseable`] if the URL is malformed
    /// or too short to carry an id.
    pub fn new(url: &str) -> Result<Self, WebhookError> {
        Webhook::new(url).map(Self::from)
    }

    /// Creates a client from a URL and an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::IdNotParseable`] if no id was supplied
    /// and none could be parsed from the URL.
    pub fn with_config(url: &str, config: WebhookConfig) -> Result<Self, WebhookError> {
        Webhook::with_config(url, config).map(Self::from)
    }

    /// Creates one independent async client per URL from a shared
    /// configuration, each with a deep clone of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::IdNotParseable`] for the first URL that
    /// fails construction.
    pub fn create_batch<I>(urls: I, config: &WebhookConfig) -> Result<Vec<Self>, WebhookError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Webhook::create_batch(urls, config)
            .map(|hooks| hooks.into_iter().map(Self::from).collect())
    }

    /// Consumes the wrapper and returns the blocking-flavored client.
    #[must_use]
    pub fn into_inner(self) -> Webhook {
        self.inner
    }

    fn session(&self) -> Result<ReqwestTransport, WebhookError> {
        Ok(ReqwestTransport::with_proxies(self.inner.proxies())?)
    }

    /// Delivers the message. See [`Webhook::execute`] for lifecycle
    /// semantics; only the suspension mechanism differs.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] for transport failures and untrusted
    /// rate-limit responses.
    pub async fn execute(&mut self, remove_embeds: bool) -> Result<WebhookResponse, WebhookError> {
        let transport = self.session()?;
        self.execute_with(&transport, &TokioSleeper, remove_embeds)
            .await
    }

    /// [`execute`](Self::execute) over a caller-supplied session.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn execute_with<T, S>(
        &mut self,
        transport: &T,
        sleeper: &S,
        remove_embeds: bool,
    ) -> Result<WebhookResponse, WebhookError>
    where
        T: Transport,
        S: Sleeper,
    {
        let request = self.inner.send_request();
        let mut response = transport.send(request.clone()).await?;
        if response.status == http::StatusCode::TOO_MANY_REQUESTS && self.inner.rate_limit_retry()
        {
            response =
                ratelimit::resend_until_clear_async(transport, sleeper, &request, response).await?;
        }
        Webhook::log_outcome(&response, "executed");
        self.inner.finish_execute(&response, remove_embeds);
        Ok(response)
    }

    /// Edits the already-sent message. See [`Webhook::edit`].
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingId`] when no message id is set,
    /// plus the same failure modes as [`execute`](Self::execute).
    pub async fn edit(&self) -> Result<WebhookResponse, WebhookError> {
        let transport = self.session()?;
        self.edit_with(&transport, &TokioSleeper).await
    }

    /// [`edit`](Self::edit) over a caller-supplied session.
    ///
    /// # Errors
    ///
    /// Same as [`edit`](Self::edit).
    pub async fn edit_with<T, S>(
        &self,
        transport: &T,
        sleeper: &S,
    ) -> Result<WebhookResponse, WebhookError>
    where
        T: Transport,
        S: Sleeper,
    {
        let request = self.inner.edit_request()?;
        let mut response = transport.send(request.clone()).await?;
        if response.status == http::StatusCode::TOO_MANY_REQUESTS && self.inner.rate_limit_retry()
        {
            response =
                ratelimit::resend_until_clear_async(transport, sleeper, &request, response).await?;
        }
        Webhook::log_outcome(&response, "edited");
        Ok(response)
    }

    /// Deletes the already-sent message. See [`Webhook::delete`].
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingId`] when no message id is set,
    /// plus the same failure modes as [`execute`](Self::execute).
    pub async fn delete(&self) -> Result<WebhookResponse, WebhookError> {
        let transport = self.session()?;
        self.delete_with(&transport, &TokioSleeper).await
    }

    /// [`delete`](Self::delete) over a caller-supplied session.
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete).
    pub async fn delete_with<T, S>(
        &self,
        transport: &T,
        sleeper: &S,
    ) -> Result<WebhookResponse, WebhookError>
    where
        T: Transport,
        S: Sleeper,
    {
        let request = self.inner.delete_request()?;
        let mut response = transport.send(request.clone()).await?;
        if response.status == http::StatusCode::TOO_MANY_REQUESTS && self.inner.rate_limit_retry()
        {
            response =
                ratelimit::resend_until_clear_async(transport, sleeper, &request, response).await?;
        }
        Webhook::log_outcome(&response, "deleted");
        Ok(response)
    }
}
