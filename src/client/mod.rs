mod builder;

use crate::error::{AppError, ClientError, Result};
use crate::{log_debug, log_warn};
pub use builder::ClientBuilder;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub struct ClientResponse {
    pub status: u16,
    pub url: String,
    pub content: String,
}

/// Bounded exponential backoff for [`Client::get_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub min_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(6),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (1-based): `min_wait * 2^(attempt-1)`,
    /// capped at `max_wait`.
    pub fn wait_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.min_wait.saturating_mul(factor).min(self.max_wait)
    }
}

pub struct Client {
    inner: ReqwestClient,
    base: Url,
    retry: RetryPolicy,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Fetches a path relative to the base URL, or an absolute URL as is,
    /// retrying with backoff on any failure.
    pub async fn get_with_retry(&self, path: &str) -> Result<ClientResponse> {
        let url = self.build_url(path)?;
        let mut attempt = 1;
        loop {
            match self.request(&url).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt >= self.retry.attempts => return Err(e),
                Err(e) => {
                    let wait = self.retry.wait_for(attempt);
                    log_warn!(
                        "[client] Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        self.retry.attempts,
                        url,
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }

    fn build_url(&self, path: &str) -> Result<String> {
        let full_url = self
            .base
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("Invalid path {}: {}", path, e)))?;

        Ok(full_url.to_string())
    }

    async fn request(&self, url: &str) -> Result<ClientResponse> {
        log_debug!("[client] GET {}", url);
        let response = self.inner.get(url).send().await?;

        let status = response.status().as_u16();
        let is_success = response.status().is_success();
        let final_url = response.url().to_string();
        let content = response.text().await?;

        if !is_success {
            return Err(AppError::Client(ClientError::ResponseError {
                status_code: status,
                url: url.to_string(),
            }));
        }

        Ok(ClientResponse {
            status,
            url: final_url,
            content,
        })
    }
}
