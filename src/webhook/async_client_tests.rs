//! Tests for the async [`AsyncWebhook`] client.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use crate::embed::Embed;
use crate::time::{InstantSleeper, Sleeper};

use super::http::{Transport, WebhookRequest, WebhookResponse};
use super::{AsyncWebhook, HttpError, WebhookConfig, WebhookError};

const URL: &str = "https://discord.com/api/webhooks/123456789/abcDEF";

/// Async transport returning canned responses and capturing requests.
struct MockTransport {
    responses: Mutex<Vec<Result<WebhookResponse, HttpError>>>,
    requests: Mutex<Vec<WebhookRequest>>,
    calls: AtomicUsize,
}

impl MockTransport {
    fn new(responses: Vec<Result<WebhookResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn replying(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(canned(status, body))])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<WebhookRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: WebhookRequest) -> Result<WebhookResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().remove(0)
    }
}

fn canned(status: u16, body: &str) -> WebhookResponse {
    WebhookResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.as_bytes().to_vec(),
    )
}

fn rate_limited(retry_after: f64, with_via: bool) -> WebhookResponse {
    let mut headers = http::HeaderMap::new();
    if with_via {
        headers.insert(http::header::VIA, http::HeaderValue::from_static("1.1 edge"));
    }
    WebhookResponse::new(
        http::StatusCode::TOO_MANY_REQUESTS,
        headers,
        format!(r#"{{"retry_after": {retry_after}}}"#).into_bytes(),
    )
}

/// Async sleeper recording every requested duration without suspending.
#[derive(Default)]
struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[tokio::test]
async fn execute_delivers_and_reconciles() {
    let mut webhook =
        AsyncWebhook::with_config(URL, WebhookConfig::new().with_content("hi")).unwrap();
    let transport = MockTransport::replying(200, r#"{"id": "987"}"#);

    let response = webhook
        .execute_with(&transport, &InstantSleeper, false)
        .await
        .unwrap();

    assert!(response.is_delivered());
    assert_eq!(webhook.id(), "987");
    let request = &transport.captured_requests()[0];
    assert_eq!(request.method, http::Method::POST);
    assert_eq!(request.url.as_str(), URL);
}

#[tokio::test]
async fn state_mutators_reach_through_to_the_shared_model() {
    let mut webhook = AsyncWebhook::new(URL).unwrap();
    webhook.set_content("from the async side");
    let mut embed = Embed::new();
    embed.set_title("t");
    webhook.add_embed(embed);
    webhook.add_file(vec![1], "a.txt");

    assert_eq!(webhook.content(), Some("from the async side"));
    assert_eq!(webhook.embeds().len(), 1);
    assert_eq!(webhook.files()[0].slot, "_a.txt");
    assert_eq!(webhook.payload()["content"], json!("from the async side"));
}

#[tokio::test]
async fn rate_limited_execute_waits_then_returns_the_success() {
    let mut webhook = AsyncWebhook::with_config(
        URL,
        WebhookConfig::new().with_content("x").with_rate_limit_retry(true),
    )
    .unwrap();
    let transport = MockTransport::new(vec![
        Ok(rate_limited(0.5, true)),
        Ok(canned(200, "{}")),
    ]);
    let sleeper = RecordingSleeper::default();

    let response = webhook.execute_with(&transport, &sleeper, false).await.unwrap();

    assert!(response.is_delivered());
    assert_eq!(transport.calls(), 2);
    let sleeps = sleeper.sleeps();
    assert_eq!(sleeps.len(), 1);
    assert!(sleeps[0] >= Duration::from_millis(650));
}

#[tokio::test]
async fn untrusted_429_fails_without_sleeping() {
    let mut webhook = AsyncWebhook::with_config(
        URL,
        WebhookConfig::new().with_content("x").with_rate_limit_retry(true),
    )
    .unwrap();
    let transport = MockTransport::new(vec![Ok(rate_limited(0.5, false))]);
    let sleeper = RecordingSleeper::default();

    let result = webhook.execute_with(&transport, &sleeper, false).await;

    assert!(matches!(result, Err(WebhookError::UntrustedRateLimit { .. })));
    assert_eq!(transport.calls(), 1);
    assert!(sleeper.sleeps().is_empty());
}

#[tokio::test]
async fn caller_supplied_session_is_reused_across_operations() {
    let mut webhook =
        AsyncWebhook::with_config(URL, WebhookConfig::new().with_content("x")).unwrap();
    let session = MockTransport::new(vec![
        Ok(canned(200, r#"{"id": "5"}"#)),
        Ok(canned(200, "{}")),
        Ok(canned(204, "")),
    ]);

    webhook.execute_with(&session, &InstantSleeper, false).await.unwrap();
    webhook.edit_with(&session, &InstantSleeper).await.unwrap();
    webhook.delete_with(&session, &InstantSleeper).await.unwrap();

    assert_eq!(session.calls(), 3);
    let requests = session.captured_requests();
    assert_eq!(requests[1].method, http::Method::PATCH);
    assert_eq!(requests[1].url.as_str(), format!("{URL}/messages/5"));
    assert_eq!(requests[2].method, http::Method::DELETE);
}

#[tokio::test]
async fn edit_requires_an_id() {
    let webhook =
        AsyncWebhook::with_config(URL, WebhookConfig::new().with_id("")).unwrap();
    let transport = MockTransport::new(vec![]);

    let result = webhook.edit_with(&transport, &InstantSleeper).await;

    assert!(matches!(
        result,
        Err(WebhookError::MissingId { operation: "edit" })
    ));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn delivery_failures_come_back_as_responses() {
    let mut webhook =
        AsyncWebhook::with_config(URL, WebhookConfig::new().with_content("x")).unwrap();
    let transport = MockTransport::replying(403, r#"{"message": "missing permissions"}"#);

    let response = webhook
        .execute_with(&transport, &InstantSleeper, false)
        .await
        .unwrap();

    assert_eq!(response.status, http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn batch_instances_are_independent() {
    let urls = [
        "https://discord.com/api/webhooks/111/tokenA",
        "https://discord.com/api/webhooks/222/tokenB",
    ];
    let config = WebhookConfig::new().with_content("hi");

    let mut batch = AsyncWebhook::create_batch(urls, &config).unwrap();
    batch[0].set_content("changed");

    assert_eq!(batch[0].content(), Some("changed"));
    assert_eq!(batch[1].content(), Some("hi"));
    assert_eq!(batch[0].id(), "111");
    assert_eq!(batch[1].id(), "222");
}

#[test]
fn into_inner_returns_the_blocking_flavor() {
    let webhook = AsyncWebhook::new(URL).unwrap();
    let blocking = webhook.into_inner();
    assert_eq!(blocking.id(), "123456789");
}
