//! Azure AD client-credential authentication

use super::constants;
use super::error::{ArmError, Result};
use crate::config::{AccountCredential, CloudEndpoints};

/// Access token for the Resource Manager audience
#[derive(Clone)]
pub struct TokenInfo {
    pub access_token: String,
}

impl std::fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInfo")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Exchange the service principal secret for an access token
pub async fn authenticate(
    http_client: &reqwest::Client,
    endpoints: &CloudEndpoints,
    credential: &AccountCredential,
) -> Result<TokenInfo> {
    let token_url = constants::token_endpoint(&endpoints.authority_host, &credential.tenant_id);
    let scope = constants::token_scope(&endpoints.resource_manager);

    log::info!(
        "Authenticating app {} against tenant {}",
        credential.app_id,
        credential.tenant_id
    );

    let response = http_client
        .post(&token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credential.app_id.as_str()),
            ("client_secret", credential.secret.as_str()),
            ("scope", scope.as_str()),
        ])
        .send()
        .await
        .map_err(|e| ArmError::Auth(format!("token request failed: {}", e)))?;

    log::debug!("Token request status: {}", response.status());

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(ArmError::Auth(describe_token_error(status.as_u16(), &error_text)));
    }

    let token_data: serde_json::Value = response
        .json()
        .await
        .map_err(|e| ArmError::Auth(format!("invalid token response: {}", e)))?;

    let access_token = token_data
        .get("access_token")
        .and_then(|t| t.as_str())
        .ok_or_else(|| ArmError::Auth("no access token in response".to_string()))?;

    // Default to 1 hour if not provided
    let expires_in = token_data
        .get("expires_in")
        .and_then(|e| e.as_u64().or_else(|| e.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(3600);

    log::info!(
        "Successfully authenticated app {} (token valid for {}s)",
        credential.app_id,
        expires_in
    );

    Ok(TokenInfo {
        access_token: access_token.to_string(),
    })
}

/// Azure AD reports failures as `{"error": "...", "error_description": "..."}`
fn describe_token_error(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let description = parsed.as_ref().and_then(|v| {
        v.get("error_description")
            .or_else(|| v.get("error"))
            .and_then(|d| d.as_str())
    });

    match description {
        Some(description) => format!("HTTP {}: {}", status, description),
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => format!("HTTP {}: {}", status, body.trim()),
    }
}
