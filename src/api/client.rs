use super::error::{ArmError, Result};
use super::models::Page;
use super::poller::LongRunningOperation;
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default delay between long-running operation polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Authenticated Resource Manager client scoped to one subscription
///
/// Cheap to clone; the HTTP connection pool is shared between clones.
#[derive(Clone)]
pub struct ArmClient {
    base_url: String,
    subscription_id: String,
    http_client: reqwest::Client,
    access_token: String,
    poll_interval: Duration,
}

impl ArmClient {
    pub fn new(
        base_url: impl Into<String>,
        subscription_id: impl Into<String>,
        access_token: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            subscription_id: subscription_id.into(),
            http_client,
            access_token: access_token.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the delay used when the service sends no Retry-After
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Shared HTTP client used for both the token exchange and ARM calls.
    /// No request timeout is set; transport defaults apply.
    pub fn build_http_client() -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("az-ip-rotate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// GET a resource and decode it
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(Method::GET, url).await?;
        let response = Self::ensure_success(response).await?;
        Self::read_json(response).await
    }

    /// GET every page of a list endpoint, following nextLink
    pub async fn list_all<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(page_url) = next.take() {
            let page: Page<T> = self.get_json(&page_url).await?;
            log::debug!("Fetched {} item(s) from {}", page.value.len(), page_url);
            items.extend(page.value);
            next = page.next_link.filter(|link| !link.is_empty());
        }

        Ok(items)
    }

    /// PUT a resource body and return a handle to the resulting operation
    pub async fn begin_put<B: Serialize>(&self, url: &str, body: &B) -> Result<LongRunningOperation> {
        log::debug!("PUT {}", url);
        let response = self
            .http_client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        LongRunningOperation::start(self.clone(), Method::PUT, url.to_string(), response).await
    }

    /// DELETE a resource and return a handle to the resulting operation
    pub async fn begin_delete(&self, url: &str) -> Result<LongRunningOperation> {
        let response = self.send(Method::DELETE, url).await?;
        let response = Self::ensure_success(response).await?;
        LongRunningOperation::start(self.clone(), Method::DELETE, url.to_string(), response).await
    }

    /// Send a bodyless authenticated request without checking the status
    pub(crate) async fn send(&self, method: Method, url: &str) -> Result<Response> {
        log::debug!("{} {}", method, url);
        let response = self
            .http_client
            .request(method, url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        log::debug!("Response status: {}", response.status());
        Ok(response)
    }

    /// Turn a non-2xx response into an `ArmError::Api`
    pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ArmError::from_response(status.as_u16(), &body))
    }

    pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
