//! hookline: compose and deliver rich webhook messages.
//!
//! A small client library for Discord-compatible webhook endpoints:
//! build embeds, attach files, send/edit/delete messages, and retry
//! transparently when the server rate-limits the request. Blocking
//! ([`Webhook`]) and async ([`AsyncWebhook`]) clients share one data
//! model and one request lifecycle; only the suspension mechanism for
//! "wait for the network" differs.

pub mod embed;
pub mod time;
pub mod webhook;

pub use embed::{Embed, EmbedError};
pub use webhook::{AsyncWebhook, Webhook, WebhookConfig, WebhookError, WebhookResponse};
