//! Long-running operation handling
//!
//! Mutating Resource Manager calls may finish asynchronously. The service
//! reports progress in one of three ways, checked in this order:
//!
//! 1. an `Azure-AsyncOperation` header pointing at a status resource whose
//!    `status` field reaches `Succeeded`, `Failed` or `Canceled`
//! 2. a `Location` header on a 202 response that keeps answering 202 until
//!    the operation is done
//! 3. a `provisioningState` on the PUT body that is polled on the resource
//!    itself until it is terminal
//!
//! Callers submit the mutation, `wait` on the returned handle, then read the
//! result. There is no attempt cap.

use super::client::ArmClient;
use super::constants::{headers, states};
use super::error::{ArmError, Result};
use super::models::AsyncOperationStatus;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub struct LongRunningOperation {
    client: ArmClient,
    method: Method,
    resource_url: String,
    status: StatusCode,
    async_operation_url: Option<String>,
    location_url: Option<String>,
    retry_after: Option<Duration>,
    body: Option<Value>,
}

impl LongRunningOperation {
    /// Capture the polling instructions from an accepted mutation response
    pub(crate) async fn start(
        client: ArmClient,
        method: Method,
        resource_url: String,
        response: Response,
    ) -> Result<Self> {
        let status = response.status();
        let response_headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<Value>(&bytes).ok();

        let operation = Self {
            client,
            method,
            resource_url,
            status,
            async_operation_url: header_string(&response_headers, headers::AZURE_ASYNC_OPERATION),
            location_url: header_string(&response_headers, headers::LOCATION),
            retry_after: parse_retry_after(&response_headers),
            body,
        };
        debug!(
            "{} {} accepted with {} (async-operation: {}, location: {})",
            operation.method,
            operation.resource_url,
            operation.status,
            operation.async_operation_url.is_some(),
            operation.location_url.is_some()
        );
        Ok(operation)
    }

    /// Block until the operation reaches a terminal state
    pub async fn wait(&self) -> Result<()> {
        if let Some(url) = &self.async_operation_url {
            return self.poll_async_operation(url).await;
        }

        if self.status == StatusCode::ACCEPTED {
            if let Some(url) = &self.location_url {
                return self.poll_location(url).await;
            }
        }

        if self.method == Method::PUT {
            if let Some(state) = self.body.as_ref().and_then(provisioning_state) {
                if !states::is_terminal(&state) {
                    return self.poll_provisioning_state().await;
                }
                return check_provisioning_outcome(&state);
            }
        }

        Ok(())
    }

    /// Wait for completion, then read the final state of the resource
    pub async fn result<T: DeserializeOwned>(self) -> Result<T> {
        self.wait().await?;
        self.client.get_json(&self.resource_url).await
    }

    async fn poll_async_operation(&self, url: &str) -> Result<()> {
        let mut delay = self.retry_after;
        loop {
            self.sleep(delay).await;

            let response = self.client.send(Method::GET, url).await?;
            delay = parse_retry_after(response.headers());
            let response = ArmClient::ensure_success(response).await?;
            let operation: AsyncOperationStatus = ArmClient::read_json(response).await?;

            if states::is_success(&operation.status) {
                return Ok(());
            }
            if states::is_terminal(&operation.status) {
                let detail = operation.error.unwrap_or_default();
                return Err(ArmError::OperationFailed {
                    state: operation.status,
                    code: detail.code,
                    message: detail.message,
                });
            }
            debug!("Operation on {} is {}", self.resource_url, operation.status);
        }
    }

    async fn poll_location(&self, url: &str) -> Result<()> {
        let mut delay = self.retry_after;
        loop {
            self.sleep(delay).await;

            let response = self.client.send(Method::GET, url).await?;
            if response.status() == StatusCode::ACCEPTED {
                delay = parse_retry_after(response.headers());
                debug!("Operation on {} still in progress", self.resource_url);
                continue;
            }
            ArmClient::ensure_success(response).await?;
            return Ok(());
        }
    }

    async fn poll_provisioning_state(&self) -> Result<()> {
        let mut delay = self.retry_after;
        loop {
            self.sleep(delay).await;

            let response = self.client.send(Method::GET, &self.resource_url).await?;
            delay = parse_retry_after(response.headers());
            let response = ArmClient::ensure_success(response).await?;
            let resource: Value = ArmClient::read_json(response).await?;

            match provisioning_state(&resource) {
                Some(state) if states::is_terminal(&state) => {
                    return check_provisioning_outcome(&state);
                }
                Some(state) => debug!("{} is {}", self.resource_url, state),
                None => return Ok(()),
            }
        }
    }

    async fn sleep(&self, retry_after: Option<Duration>) {
        let delay = retry_after.unwrap_or_else(|| self.client.poll_interval());
        tokio::time::sleep(delay).await;
    }
}

fn check_provisioning_outcome(state: &str) -> Result<()> {
    if states::is_success(state) {
        Ok(())
    } else {
        Err(ArmError::OperationFailed {
            state: state.to_string(),
            code: "ProvisioningFailed".to_string(),
            message: format!("provisioning finished in state {}", state),
        })
    }
}

fn provisioning_state(resource: &Value) -> Option<String> {
    resource
        .get("properties")?
        .get("provisioningState")?
        .as_str()
        .map(str::to_string)
}

fn header_string(map: &HeaderMap, name: &str) -> Option<String> {
    map.get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|value| !value.is_empty())
}

/// Retry-After in whole seconds; HTTP-date values are ignored
pub fn parse_retry_after(map: &HeaderMap) -> Option<Duration> {
    map.get(headers::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
