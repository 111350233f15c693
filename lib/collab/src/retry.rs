//! Bounded retry for collaborator requests.
//!
//! Collaborator failures are transient by contract; each client retries
//! 429/5xx responses and transport errors with exponential backoff before
//! surfacing a [`storyrec_core::Error::Collaborator`].

use std::thread;
use std::time::Duration;

use reqwest::blocking::{RequestBuilder, Response};
use reqwest::StatusCode;
use storyrec_core::{Error, Result};
use tracing::warn;

pub(crate) const DEFAULT_MAX_RETRIES: usize = 3;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_body() || err.is_request() || err.is_decode()
}

fn backoff(attempt: usize) -> Duration {
    let capped = attempt.min(5) as u32;
    Duration::from_millis(500 * (1 << capped))
}

/// Send a request, retrying transient failures up to `max_retries` attempts.
pub(crate) fn send_with_retry<F>(service: &str, max_retries: usize, build: F) -> Result<Response>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0usize;
    loop {
        match build().send() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    return Ok(resp);
                }

                let body = resp
                    .text()
                    .unwrap_or_else(|_| "<body unavailable>".to_string());
                if should_retry(status) && attempt + 1 < max_retries {
                    attempt += 1;
                    warn!(service, %status, attempt, "retrying collaborator request");
                    thread::sleep(backoff(attempt));
                    continue;
                }
                return Err(Error::collaborator(
                    service,
                    format!("request failed ({}): {}", status, body),
                ));
            }
            Err(err) => {
                if is_retryable_error(&err) && attempt + 1 < max_retries {
                    attempt += 1;
                    warn!(service, error = %err, attempt, "retrying collaborator request");
                    thread::sleep(backoff(attempt));
                    continue;
                }
                return Err(Error::collaborator(service, err.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(should_retry(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!should_retry(StatusCode::BAD_REQUEST));
        assert!(!should_retry(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff(1), Duration::from_millis(1000));
        assert_eq!(backoff(5), Duration::from_millis(16000));
        assert_eq!(backoff(50), Duration::from_millis(16000));
    }
}
