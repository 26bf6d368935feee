//! Webhook configuration.
//!
//! Every recognized option is an explicit struct field with its default;
//! unknown options are structurally impossible.

use std::time::Duration;

use serde::Serialize;

use crate::embed::Embed;

use super::http::FilePart;

/// Which mention categories the message may ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionParse {
    /// Role mentions.
    Roles,
    /// User mentions.
    Users,
    /// `@everyone` and `@here`.
    Everyone,
}

/// Allowed-mentions configuration for a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllowedMentions {
    /// Mention categories to parse from the content.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parse: Vec<MentionParse>,
    /// Role ids that may be mentioned.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// User ids that may be mentioned.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<String>,
    /// Whether the author of a replied-to message is pinged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_user: Option<bool>,
}

impl AllowedMentions {
    /// True when no restriction is configured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parse.is_empty()
            && self.roles.is_empty()
            && self.users.is_empty()
            && self.replied_user.is_none()
    }
}

/// Proxy URLs handed to the transport, one per scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proxies {
    /// Proxy for plain-http requests.
    pub http: Option<String>,
    /// Proxy for https requests.
    pub https: Option<String>,
}

/// Construction-time options for a webhook client.
///
/// Defaults: `wait` on, `rate_limit_retry` and `tts` off, everything
/// else unset. Builder-style `with_*` methods chain:
///
/// ```
/// use hookline::WebhookConfig;
///
/// let config = WebhookConfig::new()
///     .with_username("deploy-bot")
///     .with_content("it's out")
///     .with_rate_limit_retry(true);
/// ```
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Allowed-mentions restriction.
    pub allowed_mentions: AllowedMentions,
    /// Server-echoed attachment metadata to start from.
    pub attachments: Vec<serde_json::Value>,
    /// Avatar override for this message.
    pub avatar_url: Option<String>,
    /// Message text.
    pub content: Option<String>,
    /// Embeds attached to the message.
    pub embeds: Vec<Embed>,
    /// Files to upload, one slot per filename.
    pub files: Vec<FilePart>,
    /// Explicit webhook id; parsed from the URL when absent.
    pub id: Option<String>,
    /// Proxy configuration for the transport.
    pub proxies: Option<Proxies>,
    /// Transparently resend when rate limited.
    pub rate_limit_retry: bool,
    /// Target an existing thread by id.
    pub thread_id: Option<String>,
    /// Name of a thread to create in a forum channel.
    pub thread_name: Option<String>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// Send as a text-to-speech message.
    pub tts: bool,
    /// Username override for this message.
    pub username: Option<String>,
    /// Wait for server confirmation before the response returns.
    pub wait: bool,
    /// Component tree, passed through untyped.
    pub components: Option<serde_json::Value>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            allowed_mentions: AllowedMentions::default(),
            attachments: Vec::new(),
            avatar_url: None,
            content: None,
            embeds: Vec::new(),
            files: Vec::new(),
            id: None,
            proxies: None,
            rate_limit_retry: false,
            thread_id: None,
            thread_name: None,
            timeout: None,
            tts: false,
            username: None,
            wait: true,
            components: None,
        }
    }
}

impl WebhookConfig {
    /// Creates a configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the allowed-mentions restriction.
    #[must_use]
    pub fn with_allowed_mentions(mut self, allowed_mentions: AllowedMentions) -> Self {
        self.allowed_mentions = allowed_mentions;
        self
    }

    /// Sets the avatar override.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Sets the message text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the initial embed sequence.
    #[must_use]
    pub fn with_embeds(mut self, embeds: Vec<Embed>) -> Self {
        self.embeds = embeds;
        self
    }

    /// Sets an explicit webhook id, skipping URL parsing.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the proxy configuration.
    #[must_use]
    pub fn with_proxies(mut self, proxies: Proxies) -> Self {
        self.proxies = Some(proxies);
        self
    }

    /// Enables or disables transparent rate-limit retry.
    #[must_use]
    pub const fn with_rate_limit_retry(mut self, retry: bool) -> Self {
        self.rate_limit_retry = retry;
        self
    }

    /// Targets an existing thread.
    #[must_use]
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Names a thread to create.
    #[must_use]
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = Some(thread_name.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Marks the message as text-to-speech.
    #[must_use]
    pub const fn with_tts(mut self, tts: bool) -> Self {
        self.tts = tts;
        self
    }

    /// Sets the username override.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Enables or disables waiting for server confirmation.
    #[must_use]
    pub const fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Sets the component tree.
    #[must_use]
    pub fn with_components(mut self, components: serde_json::Value) -> Self {
        self.components = Some(components);
        self
    }
}
