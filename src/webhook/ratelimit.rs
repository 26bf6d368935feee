//! Rate-limit detection and the resend-until-clear loop.
//!
//! The loop has no attempt cap: the server's `retry_after` window
//! eventually clears, and the per-request timeout is the only backstop.
//! A 429 without the `Via` routing marker header did not come through
//! the provider's edge and aborts the loop instead of resending against
//! a non-cooperating endpoint.

use std::time::Duration;

use crate::time::{BlockingSleeper, Sleeper};

use super::http::{BlockingTransport, Transport, WebhookRequest, WebhookResponse};
use super::WebhookError;

/// Fixed margin added to `retry_after` to avoid racing the boundary of
/// the server's window reset.
pub const RETRY_MARGIN: Duration = Duration::from_millis(150);

/// Extracts the wait duration from a trusted 429 response.
///
/// # Errors
///
/// Returns [`WebhookError::UntrustedRateLimit`] when the routing marker
/// header is missing or the body carries no usable fractional
/// `retry_after` (absent, negative, non-finite or overflowing).
pub fn retry_delay(response: &WebhookResponse) -> Result<Duration, WebhookError> {
    let untrusted = || WebhookError::UntrustedRateLimit {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    };

    if !response.headers.contains_key(http::header::VIA) {
        return Err(untrusted());
    }
    let retry_after = response
        .json()
        .and_then(|body| body.get("retry_after")?.as_f64())
        .ok_or_else(untrusted)?;
    // Rejects NaN, negatives and absurdly large values in one place.
    let delay = Duration::try_from_secs_f64(retry_after).map_err(|_| untrusted())?;
    Ok(delay + RETRY_MARGIN)
}

fn is_rate_limited(response: &WebhookResponse) -> bool {
    response.status == http::StatusCode::TOO_MANY_REQUESTS
}

/// Resends `request` until the rate limit clears (blocking flavor).
///
/// # Errors
///
/// Propagates transport failures and untrusted 429s.
pub(super) fn resend_until_clear<T, S>(
    transport: &T,
    sleeper: &S,
    request: &WebhookRequest,
    mut response: WebhookResponse,
) -> Result<WebhookResponse, WebhookError>
where
    T: BlockingTransport,
    S: BlockingSleeper,
{
    while is_rate_limited(&response) {
        let delay = retry_delay(&response)?;
        tracing::error!(
            "webhook rate limited: sleeping for {:.2} seconds...",
            delay.as_secs_f64()
        );
        sleeper.sleep(delay);
        response = transport.send(request.clone())?;
        if response.is_delivered() {
            break;
        }
    }
    Ok(response)
}

/// Resends `request` until the rate limit clears (async flavor).
///
/// # Errors
///
/// Propagates transport failures and untrusted 429s.
pub(super) async fn resend_until_clear_async<T, S>(
    transport: &T,
    sleeper: &S,
    request: &WebhookRequest,
    mut response: WebhookResponse,
) -> Result<WebhookResponse, WebhookError>
where
    T: Transport,
    S: Sleeper,
{
    while is_rate_limited(&response) {
        let delay = retry_delay(&response)?;
        tracing::error!(
            "webhook rate limited: sleeping for {:.2} seconds...",
            delay.as_secs_f64()
        );
        sleeper.sleep(delay).await;
        response = transport.send(request.clone()).await?;
        if response.is_delivered() {
            break;
        }
    }
    Ok(response)
}
