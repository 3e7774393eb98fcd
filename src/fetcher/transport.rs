use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use wreq::{Client, RequestBuilder, Response};
use wreq_util::Emulation;

use crate::config::HttpConfig;

/// Outbound GET description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub cookie: Option<String>,
    /// Ask every cache on the way to revalidate
    pub no_cache: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    /// `name=value` part of every `Set-Cookie` header
    pub cookies: Vec<String>,
}

/// HTTP capability the resolvers depend on
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<FetchResponse>;
}

/// Authentication artifact from a login; lives for one resolution call
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSession {
    cookie: String,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_session(mut self, session: Option<&ProviderSession>) -> Self {
        self.cookie = session.map(|s| s.cookie.clone());
        self
    }

    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }
}

impl ProviderSession {
    /// `None` when the login response set no cookies
    pub fn from_cookies(cookies: &[String]) -> Option<Self> {
        let cookie = cookies
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        if cookie.is_empty() {
            None
        } else {
            Some(Self { cookie })
        }
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

/// `wreq` transport with browser emulation and retry on GET
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(HttpTransport { client, config })
    }

    async fn send_get(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let mut builder = self
            .client
            .get(&request.url)
            .header("User-Agent", &self.config.user_agent);

        builder = Self::apply_headers(builder, &request.headers);

        if let Some(ref cookie) = request.cookie {
            builder = builder.header("Cookie", cookie);
        }

        if request.no_cache {
            builder = builder
                .header("Cache-Control", "no-cache")
                .header("Pragma", "no-cache");
        }

        let response = builder
            .send()
            .await
            .map_err(|e| anyhow!("Network error: {}", e))?;

        Self::read_response(response).await
    }

    fn apply_headers(mut builder: RequestBuilder, headers: &[(String, String)]) -> RequestBuilder {
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    async fn read_response(response: Response) -> Result<FetchResponse> {
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP error: {}", status));
        }

        let cookies = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(|pair| pair.trim().to_string())
            .filter(|pair| !pair.is_empty())
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response text: {}", e))?;

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
            cookies,
        })
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        let base = self.config.retry_base_delay_ms.max(1);
        let exponential = base.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1) as u32));
        Duration::from_millis(exponential + (rand::random::<u64>() % base))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse> {
        let mut attempts = 0;

        loop {
            match self.send_get(&request).await {
                Ok(response) => {
                    info!("Fetched {} characters from {}", response.body.len(), request.url);
                    return Ok(response);
                }
                Err(e) => {
                    attempts += 1;
                    if attempts >= self.config.max_attempts {
                        return Err(e);
                    }

                    let delay = self.backoff_delay(attempts);
                    warn!("Attempt {} failed for {}, retrying in {:?}: {}", attempts, request.url, delay, e);
                    sleep(delay).await;
                }
            }
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<FetchResponse> {
        let response = self
            .client
            .post(url)
            .header("User-Agent", &self.config.user_agent)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("Network error: {}", e))?;

        Self::read_response(response).await
    }
}
