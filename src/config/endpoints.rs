use crate::api::constants::{DEFAULT_AUTHORITY_HOST, DEFAULT_RESOURCE_MANAGER};
use log::debug;

pub const AUTHORITY_HOST_VAR: &str = "AZURE_AUTHORITY_HOST";
pub const RESOURCE_MANAGER_VAR: &str = "AZURE_RESOURCE_MANAGER_ENDPOINT";

/// Token authority and Resource Manager endpoint of the target cloud
#[derive(Debug, Clone, PartialEq)]
pub struct CloudEndpoints {
    pub authority_host: String,
    pub resource_manager: String,
}

impl Default for CloudEndpoints {
    fn default() -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            resource_manager: DEFAULT_RESOURCE_MANAGER.to_string(),
        }
    }
}

impl CloudEndpoints {
    pub fn new(authority_host: impl Into<String>, resource_manager: impl Into<String>) -> Self {
        Self {
            authority_host: authority_host.into(),
            resource_manager: resource_manager.into(),
        }
    }

    /// Public cloud defaults, overridable from the environment or a `.env` file
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let endpoints = Self {
            authority_host: non_empty_var(AUTHORITY_HOST_VAR).unwrap_or(defaults.authority_host),
            resource_manager: non_empty_var(RESOURCE_MANAGER_VAR)
                .unwrap_or(defaults.resource_manager),
        };
        debug!("Using cloud endpoints: {:?}", endpoints);
        endpoints
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
