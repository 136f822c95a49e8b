use super::{Client, RetryPolicy};
use crate::error::{ClientError, Result};
use crate::session::SessionHeaders;
use http::{
    header::{HeaderMap, HeaderName},
    HeaderValue,
};
use reqwest::{Client as ReqwestClient, Proxy};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    proxy: Option<String>,
    headers: HeaderMap,
    timeout: Option<Duration>,
    retry: RetryPolicy,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            ..Default::default()
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Empty strings are ignored so an unset config value can be passed through.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        let proxy = proxy.into();
        if !proxy.is_empty() {
            self.proxy = Some(proxy);
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let header_name = HeaderName::from_str(key.as_ref())
            .map_err(|e| ClientError::BuildError(format!("Invalid header name: {}", e)))?;

        let header_value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| ClientError::BuildError(format!("Invalid header value: {}", e)))?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn session(self, session: &SessionHeaders) -> Result<Self> {
        session
            .iter()
            .try_fold(self, |builder, (key, value)| builder.header(key, value))
    }

    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::BuildError("Base URL is required".to_string()))?;

        let base = Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("Invalid base URL: {}", e)))?;

        let mut client_builder = ReqwestClient::builder().default_headers(self.headers);

        if let Some(proxy_url) = self.proxy {
            client_builder = client_builder.proxy(Proxy::all(&proxy_url).map_err(|e| {
                ClientError::BuildError(format!("Failed to configure proxy: {}", e))
            })?);
        }

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let inner = client_builder
            .build()
            .map_err(|e| ClientError::BuildError(format!("Failed to build client: {}", e)))?;

        Ok(Client {
            inner,
            base,
            retry: self.retry,
        })
    }
}
