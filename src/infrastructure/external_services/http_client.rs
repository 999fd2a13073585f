use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::application::ports::prediction_service::IntegrationError;
use crate::config::HttpClientConfig;

const MAX_ERROR_BODY: usize = 512;

/// Shared outbound client: one timeout and a bounded retry with exponential
/// backoff on network errors, timeouts, 429 and 5xx.
#[derive(Debug, Clone)]
pub struct RetryingHttpClient {
    client: Client,
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryingHttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, IntegrationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IntegrationError::Network(e.to_string()))?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            backoff_base: config.backoff_base,
        })
    }

    /// Sends the request built by `build` until it succeeds or the attempts
    /// run out, returning the body of the first 2xx response. `build` is
    /// called once per attempt.
    pub async fn send<F>(&self, label: &str, build: F) -> Result<String, IntegrationError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 1;

        loop {
            match self.execute(build(&self.client)).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "{} request failed, retrying",
                        label
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String, IntegrationError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(IntegrationError::Status {
                status: status.as_u16(),
                body: truncate(body),
            });
        }

        Ok(body)
    }

    fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

fn transport_error(error: reqwest::Error) -> IntegrationError {
    if error.is_timeout() {
        IntegrationError::Timeout
    } else {
        IntegrationError::Network(error.without_url().to_string())
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(max_attempts: u32) -> RetryingHttpClient {
        RetryingHttpClient::new(&HttpClientConfig {
            timeout: Duration::from_secs(5),
            max_attempts,
            backoff_base: Duration::from_millis(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_retries_server_errors_until_exhausted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flaky")
            .with_status(503)
            .with_body("busy")
            .expect(3)
            .create_async()
            .await;

        let url = format!("{}/flaky", server.url());
        let result = client(3).send("test", |http| http.get(&url)).await;

        assert!(matches!(
            result,
            Err(IntegrationError::Status { status: 503, .. })
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bad")
            .with_status(400)
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/bad", server.url());
        let result = client(3).send("test", |http| http.get(&url)).await;

        assert!(matches!(
            result,
            Err(IntegrationError::Status { status: 400, .. })
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let result = client(1)
            .send("test", |http| http.get("http://127.0.0.1:1/"))
            .await;

        assert!(matches!(result, Err(IntegrationError::Network(_))));
    }

    #[test]
    fn test_backoff_doubles() {
        let http = RetryingHttpClient::new(&HttpClientConfig {
            timeout: Duration::from_secs(1),
            max_attempts: 3,
            backoff_base: Duration::from_millis(100),
        })
        .unwrap();

        assert_eq!(http.backoff_for(1), Duration::from_millis(100));
        assert_eq!(http.backoff_for(2), Duration::from_millis(200));
        assert_eq!(http.backoff_for(3), Duration::from_millis(400));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "é".repeat(MAX_ERROR_BODY);
        assert!(truncate(body).len() <= MAX_ERROR_BODY);
    }
}
