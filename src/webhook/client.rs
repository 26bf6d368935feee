//! The blocking webhook client and the shared data model.
//!
//! [`Webhook`] owns the full message state (content, embeds, files,
//! formatting flags) and the request lifecycle: serialize, submit,
//! retry on rate limit, reconcile server-assigned state. The async
//! client wraps this same struct, so everything that is not an actual
//! network call lives here.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::embed::Embed;
use crate::time::{BlockingSleeper, ThreadSleeper};

use super::config::{AllowedMentions, Proxies, WebhookConfig};
use super::http::{BlockingTransport, FilePart, RequestBody, WebhookRequest, WebhookResponse};
use super::ratelimit;
use super::transport::BlockingReqwestTransport;
use super::{HttpError, WebhookError};

/// A client for one webhook target.
///
/// Constructed once per logical webhook; embeds and files are mutated
/// incrementally, then [`execute`](Self::execute) delivers the message.
/// After a successful send the server-assigned message id (and any
/// echoed attachment metadata) overwrite local state, which is what
/// makes a later [`edit`](Self::edit) or [`delete`](Self::delete)
/// address the right message.
///
/// Every network operation blocks the calling thread. Instances are not
/// internally synchronized; share across threads by giving each thread
/// its own instance.
///
/// # Example
///
/// ```no_run
/// use hookline::{Webhook, WebhookConfig};
///
/// # fn main() -> Result<(), hookline::WebhookError> {
/// let mut webhook = Webhook::with_config(
///     "https://discord.com/api/webhooks/123456789/token",
///     WebhookConfig::new().with_content("hello").with_rate_limit_retry(true),
/// )?;
/// let response = webhook.execute(false)?;
/// assert!(response.is_delivered());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Webhook {
    url: Url,
    id: String,
    content: Option<String>,
    username: Option<String>,
    avatar_url: Option<String>,
    tts: bool,
    allowed_mentions: AllowedMentions,
    embeds: Vec<Embed>,
    files: Vec<FilePart>,
    attachments: Vec<serde_json::Value>,
    components: Option<serde_json::Value>,
    thread_id: Option<String>,
    thread_name: Option<String>,
    rate_limit_retry: bool,
    wait: bool,
    timeout: Option<Duration>,
    proxies: Option<Proxies>,
}

/// Wire payload view over a [`Webhook`], fields present only if set.
#[derive(Serialize)]
struct Payload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
    #[serde(skip_serializing_if = "skip_false")]
    tts: bool,
    #[serde(skip_serializing_if = "slice_is_empty")]
    embeds: &'a [Embed],
    #[serde(skip_serializing_if = "mentions_empty")]
    allowed_mentions: &'a AllowedMentions,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "slice_is_empty")]
    attachments: &'a [serde_json::Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_name: Option<&'a str>,
}

const fn skip_false(value: &bool) -> bool {
    !*value
}

fn slice_is_empty<T>(slice: &&[T]) -> bool {
    slice.is_empty()
}

fn mentions_empty(mentions: &&AllowedMentions) -> bool {
    mentions.is_empty()
}

/// The path segment immediately before the final one, i.e. the `<id>`
/// of a `.../<id>/<token>` webhook URL.
fn id_from_url(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.collect();
    let index = segments.len().checked_sub(2)?;
    let id = segments[index];
    (!id.is_empty()).then(|| id.to_string())
}

impl Webhook {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::IdNotParseable`] if the URL is malformed
    /// or too short to carry an id.
    pub fn new(url: &str) -> Result<Self, WebhookError> {
        Self::with_config(url, WebhookConfig::default())
    }

    /// Creates a client from a URL and an explicit configuration.
    ///
    /// When `config.id` is absent the id is parsed from the URL's path
    /// (the segment immediately before the final one).
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::IdNotParseable`] if no id was supplied
    /// and none could be parsed from the URL.
    pub fn with_config(url: &str, config: WebhookConfig) -> Result<Self, WebhookError> {
        let parsed = Url::parse(url).map_err(|_| WebhookError::IdNotParseable(url.to_string()))?;
        let id = match config.id {
            Some(id) => id,
            None => id_from_url(&parsed)
                .ok_or_else(|| WebhookError::IdNotParseable(url.to_string()))?,
        };
        Ok(Self {
            url: parsed,
            id,
            content: config.content,
            username: config.username,
            avatar_url: config.avatar_url,
            tts: config.tts,
            allowed_mentions: config.allowed_mentions,
            embeds: config.embeds,
            files: config.files,
            attachments: config.attachments,
            components: config.components,
            thread_id: config.thread_id,
            thread_name: config.thread_name,
            rate_limit_retry: config.rate_limit_retry,
            wait: config.wait,
            timeout: config.timeout,
            proxies: config.proxies,
        })
    }

    /// Creates one independent client per URL from a shared configuration.
    ///
    /// Each instance gets a deep clone of `config`, so mutating one
    /// instance's embeds, files or attachments never leaks into another.
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
        urls.into_iter()
            .map(|url| Self::with_config(url.as_ref(), config.clone()))
            .collect()
    }

    /// The webhook id: parsed from the URL at construction, overwritten
    /// with the server-assigned message id after a successful send.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// The message text, if set.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// The attached embeds, in order.
    #[must_use]
    pub fn embeds(&self) -> &[Embed] {
        &self.embeds
    }

    /// The staged file uploads, in slot order.
    #[must_use]
    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    /// Server-echoed attachment metadata from the last send with files.
    #[must_use]
    pub fn attachments(&self) -> &[serde_json::Value] {
        &self.attachments
    }

    /// Sets the message text.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    /// Sets the proxies used by transports this client creates.
    pub fn set_proxies(&mut self, proxies: Proxies) {
        self.proxies = Some(proxies);
    }

    /// Appends an embed to the message.
    pub fn add_embed(&mut self, embed: Embed) {
        self.embeds.push(embed);
    }

    /// Removes and returns the embed at `index`, or `None` if out of range.
    pub fn remove_embed(&mut self, index: usize) -> Option<Embed> {
        (index < self.embeds.len()).then(|| self.embeds.remove(index))
    }

    /// Removes all embeds.
    pub fn remove_embeds(&mut self) {
        self.embeds.clear();
    }

    /// Stages a file upload under a slot keyed by its filename.
    ///
    /// Adding a second file with the same filename replaces the first.
    pub fn add_file(&mut self, bytes: Vec<u8>, filename: impl Into<String>) {
        let part = FilePart::new(bytes, filename);
        if let Some(existing) = self.files.iter_mut().find(|f| f.slot == part.slot) {
            *existing = part;
        } else {
            self.files.push(part);
        }
    }

    /// Removes the staged file with the given filename, along with any
    /// server-echoed attachment metadata entry for the same filename.
    pub fn remove_file(&mut self, filename: &str) {
        self.files.retain(|f| f.filename != filename);
        if let Some(index) = self.attachments.iter().position(|attachment| {
            attachment.get("filename").and_then(serde_json::Value::as_str) == Some(filename)
        }) {
            self.attachments.remove(index);
        }
    }

    /// Removes all staged files, optionally clearing attachment metadata.
    pub fn remove_files(&mut self, clear_attachments: bool) {
        self.files.clear();
        if clear_attachments {
            self.clear_attachments();
        }
    }

    /// Removes all server-echoed attachment metadata.
    pub fn clear_attachments(&mut self) {
        self.attachments.clear();
    }

    /// Serializes the message into its wire-format mapping.
    ///
    /// Fields that are unset stay absent. Emits a diagnostic when the
    /// message has no content, no non-empty embed and no file; the
    /// message is still sent, the server just rejects it, so this is a
    /// warning rather than a blocking error.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        let has_content = self.content.as_deref().is_some_and(|c| !c.is_empty());
        let has_embeds = self.embeds.iter().any(|embed| !embed.is_empty());
        if !has_content && !has_embeds && self.files.is_empty() {
            tracing::error!("webhook message is empty! set content or embed data");
        }
        let view = Payload {
            content: self.content.as_deref(),
            username: self.username.as_deref(),
            avatar_url: self.avatar_url.as_deref(),
            tts: self.tts,
            embeds: &self.embeds,
            allowed_mentions: &self.allowed_mentions,
            components: self.components.as_ref(),
            attachments: &self.attachments,
            thread_name: self.thread_name.as_deref(),
        };
        serde_json::to_value(view).expect("payload serialization is infallible")
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(thread_id) = &self.thread_id {
            params.push(("thread_id", thread_id.clone()));
        }
        if self.wait {
            params.push(("wait", "true".to_string()));
        }
        params
    }

    /// JSON body without files, multipart with `payload_json` otherwise.
    fn request_body(&self) -> RequestBody {
        let payload = self.payload();
        if self.files.is_empty() {
            RequestBody::Json(payload)
        } else {
            RequestBody::Multipart {
                payload_json: payload.to_string(),
                files: self.files.clone(),
            }
        }
    }

    pub(super) fn send_request(&self) -> WebhookRequest {
        WebhookRequest {
            method: http::Method::POST,
            url: self.url.clone(),
            query: self.query_params(),
            body: self.request_body(),
            timeout: self.timeout,
        }
    }

    fn message_url(&self, operation: &'static str) -> Result<Url, WebhookError> {
        if self.id.is_empty() {
            return Err(WebhookError::MissingId { operation });
        }
        let raw = format!("{}/messages/{}", self.url, self.id);
        Url::parse(&raw).map_err(|_| WebhookError::Http(HttpError::InvalidUrl(raw)))
    }

    pub(super) fn edit_request(&self) -> Result<WebhookRequest, WebhookError> {
        Ok(WebhookRequest {
            method: http::Method::PATCH,
            url: self.message_url("edit")?,
            // Edits always wait for confirmation.
            query: vec![("wait", "true".to_string())],
            body: self.request_body(),
            timeout: self.timeout,
        })
    }

    pub(super) fn delete_request(&self) -> Result<WebhookRequest, WebhookError> {
        Ok(WebhookRequest {
            method: http::Method::DELETE,
            url: self.message_url("delete")?,
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: self.timeout,
        })
    }

    pub(super) const fn rate_limit_retry(&self) -> bool {
        self.rate_limit_retry
    }

    pub(super) const fn proxies(&self) -> Option<&Proxies> {
        self.proxies.as_ref()
    }

    /// Absorbs server-assigned state from a response body. Best-effort:
    /// non-JSON bodies are ignored.
    pub(super) fn reconcile(&mut self, response: &WebhookResponse) {
        let Some(body) = response.json() else { return };
        if let Some(id) = body.get("id").and_then(serde_json::Value::as_str) {
            self.id = id.to_string();
        }
        if let Some(attachments) = body.get("attachments").and_then(serde_json::Value::as_array) {
            self.attachments = attachments.clone();
        }
    }

    /// Post-send housekeeping shared by both execution modes.
    pub(super) fn finish_execute(&mut self, response: &WebhookResponse, remove_embeds: bool) {
        if remove_embeds {
            self.remove_embeds();
        }
        // Files never survive a send; attachments describe what the
        // server now holds, so they stay.
        self.remove_files(false);
        self.reconcile(response);
    }

    pub(super) fn log_outcome(response: &WebhookResponse, verb: &str) {
        if response.is_delivered() {
            tracing::debug!("webhook {verb}");
        } else {
            tracing::error!(
                "webhook status code {}: {}",
                response.status.as_u16(),
                response.body_text().unwrap_or("<non-utf8 body>")
            );
        }
    }

    /// Delivers the message, blocking until a terminal response.
    ///
    /// On 429 with rate-limit retry enabled the identical request is
    /// resent until the window clears. Any other non-2xx status is a
    /// normal outcome: it is logged and returned for inspection, not
    /// raised. Afterwards staged files are always cleared (attachments
    /// survive), embeds are cleared when `remove_embeds` is set, and
    /// the server-assigned id/attachments are absorbed best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] for transport failures and untrusted
    /// rate-limit responses.
    pub fn execute(&mut self, remove_embeds: bool) -> Result<WebhookResponse, WebhookError> {
        let transport = BlockingReqwestTransport::with_proxies(self.proxies.as_ref())?;
        self.execute_with(&transport, &ThreadSleeper, remove_embeds)
    }

    /// [`execute`](Self::execute) with an injected transport and sleeper.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn execute_with<T, S>(
        &mut self,
        transport: &T,
        sleeper: &S,
        remove_embeds: bool,
    ) -> Result<WebhookResponse, WebhookError>
    where
        T: BlockingTransport,
        S: BlockingSleeper,
    {
        let request = self.send_request();
        let mut response = transport.send(request.clone())?;
        if response.status == http::StatusCode::TOO_MANY_REQUESTS && self.rate_limit_retry {
            response = ratelimit::resend_until_clear(transport, sleeper, &request, response)?;
        }
        Self::log_outcome(&response, "executed");
        self.finish_execute(&response, remove_embeds);
        Ok(response)
    }

    /// Edits the already-sent message with the current payload.
    ///
    /// Requires the id and URL to address `{url}/messages/{id}`; always
    /// waits for confirmation. Same rate-limit handling as
    /// [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingId`] when no message id is set,
    /// plus the same failure modes as [`execute`](Self::execute).
    pub fn edit(&self) -> Result<WebhookResponse, WebhookError> {
        let transport = BlockingReqwestTransport::with_proxies(self.proxies.as_ref())?;
        self.edit_with(&transport, &ThreadSleeper)
    }

    /// [`edit`](Self::edit) with an injected transport and sleeper.
    ///
    /// # Errors
    ///
    /// Same as [`edit`](Self::edit).
    pub fn edit_with<T, S>(&self, transport: &T, sleeper: &S) -> Result<WebhookResponse, WebhookError>
    where
        T: BlockingTransport,
        S: BlockingSleeper,
    {
        let request = self.edit_request()?;
        let mut response = transport.send(request.clone())?;
        if response.status == http::StatusCode::TOO_MANY_REQUESTS && self.rate_limit_retry {
            response = ratelimit::resend_until_clear(transport, sleeper, &request, response)?;
        }
        Self::log_outcome(&response, "edited");
        Ok(response)
    }

    /// Deletes the already-sent message.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::MissingId`] when no message id is set,
    /// plus the same failure modes as [`execute`](Self::execute).
    pub fn delete(&self) -> Result<WebhookResponse, WebhookError> {
        let transport = BlockingReqwestTransport::with_proxies(self.proxies.as_ref())?;
        self.delete_with(&transport, &ThreadSleeper)
    }

    /// [`delete`](Self::delete) with an injected transport and sleeper.
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete).
    pub fn delete_with<T, S>(
        &self,
        transport: &T,
        sleeper: &S,
    ) -> Result<WebhookResponse, WebhookError>
    where
        T: BlockingTransport,
        S: BlockingSleeper,
    {
        let request = self.delete_request()?;
        let mut response = transport.send(request.clone())?;
        if response.status == http::StatusCode::TOO_MANY_REQUESTS && self.rate_limit_retry {
            response = ratelimit::resend_until_clear(transport, sleeper, &request, response)?;
        }
        Self::log_outcome(&response, "deleted");
        Ok(response)
    }
}
