use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

const BASE_BACKOFF_SECS: u64 = 1;
const MAX_BACKOFF_SECS: u64 = 60;

/// `Retry-After` in seconds if present, else exponential backoff capped at one minute.
fn retry_delay(response: &reqwest::Response, attempt: u32) -> Duration {
    if let Some(val) = response.headers().get(reqwest::header::RETRY_AFTER)
        && let Ok(s) = val.to_str()
        && let Ok(secs) = s.trim().parse::<u64>()
    {
        return Duration::from_secs(secs.min(MAX_BACKOFF_SECS));
    }
    Duration::from_secs(backoff_secs(attempt))
}

fn backoff_secs(attempt: u32) -> u64 {
    BASE_BACKOFF_SECS
        .checked_shl(attempt)
        .unwrap_or(MAX_BACKOFF_SECS)
        .min(MAX_BACKOFF_SECS)
}

/// Send an HTTP request, retrying up to `max_retries` times on 429 responses.
///
/// Non-429 responses, successful or not, are handed back to the caller.
///
/// # Errors
///
/// Returns `LlmError::RateLimited` if all attempts are exhausted, or the underlying
/// `reqwest::Error` wrapped as `LlmError::Http` for transport failures.
pub(crate) async fn send_with_retry<F, Fut>(
    provider_name: &str,
    max_retries: u32,
    mut f: F,
) -> Result<reqwest::Response, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..=max_retries {
        let response = f().await?;
        if response.status() != reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Ok(response);
        }
        if attempt == max_retries {
            break;
        }

        let delay = retry_delay(&response, attempt);
        tracing::warn!(
            provider = provider_name,
            delay_secs = delay.as_secs(),
            attempt = attempt + 1,
            max_retries,
            "rate limited, retrying"
        );
        tokio::time::sleep(delay).await;
    }

    Err(LlmError::RateLimited)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_secs(0), 1);
        assert_eq!(backoff_secs(1), 2);
        assert_eq!(backoff_secs(2), 4);
        assert_eq!(backoff_secs(6), 60);
        assert_eq!(backoff_secs(200), 60);
    }

    async fn send(server: &MockServer, max_retries: u32) -> Result<reqwest::Response, LlmError> {
        let client = reqwest::Client::new();
        let url = format!("{}/test", server.uri());
        send_with_retry("test", max_retries, || client.get(&url).send()).await
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let response = send(&server, 3).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn exhausted_retries_return_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .expect(2)
            .mount(&server)
            .await;

        let result = send(&server, 1).await;
        assert!(
            matches!(result, Err(LlmError::RateLimited)),
            "expected RateLimited, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn succeeds_after_one_429() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let response = send(&server, 2).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let response = send(&server, 3).await.unwrap();
        assert_eq!(response.status(), 500);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn backoff_never_exceeds_cap(attempt in 0u32..u32::MAX) {
            let secs = backoff_secs(attempt);
            prop_assert!((BASE_BACKOFF_SECS..=MAX_BACKOFF_SECS).contains(&secs));
        }
    }
}
