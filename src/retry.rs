//! HTTP retry helper for transient failures.
//!
//! Every request the pipeline makes goes through [`send_with_retry`]: connection
//! errors, timeouts, HTTP 429 and 5xx are retried with exponential backoff
//! (`base_delay * 2^attempt`); other 4xx statuses are permanent.

use crate::config::HttpConfig;
use log::warn;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Outcome of the last attempt when retries are exhausted or the error is permanent.
#[derive(Debug)]
pub enum RequestFailure {
    Network(reqwest::Error),
    Status {
        status: StatusCode,
        source: reqwest::Error,
    },
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

pub(crate) fn backoff(attempt: u32, config: &HttpConfig) -> Duration {
    Duration::from_millis(config.base_delay_ms.saturating_mul(1u64 << attempt.min(16)))
}

/// Sends the request built by `build_request`, retrying transient failures.
///
/// The closure is called once per attempt since a `RequestBuilder` is consumed by `send`.
pub async fn send_with_retry<F>(
    build_request: F,
    config: &HttpConfig,
) -> Result<Response, RequestFailure>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let failure = match build_request().send().await {
            Ok(response) => match response.error_for_status() {
                Ok(response) => return Ok(response),
                Err(e) => match e.status() {
                    Some(status) => RequestFailure::Status { status, source: e },
                    None => RequestFailure::Network(e),
                },
            },
            Err(e) => RequestFailure::Network(e),
        };

        let retryable = match &failure {
            RequestFailure::Status { status, .. } => is_retryable_status(*status),
            RequestFailure::Network(e) => is_retryable_error(e),
        };
        if !retryable || attempt >= config.max_retries {
            return Err(failure);
        }

        let delay = backoff(attempt, config);
        warn!(
            "Request failed ({:?}), retry {}/{} in {:?}",
            failure,
            attempt + 1,
            config.max_retries,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
