//! Webhook clients: payload state, delivery lifecycle, rate-limit retry.
//!
//! This module provides:
//! - The message data model and blocking client ([`Webhook`])
//! - The async client sharing that model ([`AsyncWebhook`])
//! - Explicit construction options ([`WebhookConfig`])
//! - Request/response value types and transport traits
//!   ([`WebhookRequest`], [`WebhookResponse`], [`Transport`],
//!   [`BlockingTransport`])
//! - Production reqwest transports ([`ReqwestTransport`],
//!   [`BlockingReqwestTransport`])
//! - Rate-limit detection ([`ratelimit::retry_delay`], [`RETRY_MARGIN`])

mod async_client;
mod client;
mod config;
mod error;
mod http;
pub mod ratelimit;
mod transport;

#[cfg(test)]
mod async_client_tests;

pub use async_client::AsyncWebhook;
pub use client::Webhook;
pub use config::{AllowedMentions, MentionParse, Proxies, WebhookConfig};
pub use error::{HttpError, WebhookError};
pub use http::{
    BlockingTransport, FilePart, RequestBody, Transport, WebhookRequest, WebhookResponse,
};
pub use ratelimit::RETRY_MARGIN;
pub use transport::{BlockingReqwestTransport, ReqwestTransport};
