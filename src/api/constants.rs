//! API constants and URL builders for the Azure Resource Manager REST API

/// Azure AD authority for the public cloud
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Resource Manager endpoint for the public cloud
pub const DEFAULT_RESOURCE_MANAGER: &str = "https://management.azure.com";

/// api-version for Microsoft.Resources (resource groups)
pub const RESOURCES_API_VERSION: &str = "2021-04-01";

/// api-version for Microsoft.Compute
pub const COMPUTE_API_VERSION: &str = "2023-03-01";

/// api-version for Microsoft.Network
pub const NETWORK_API_VERSION: &str = "2023-05-01";

/// Resource provider namespaces and resource types
pub mod providers {
    pub const COMPUTE: &str = "Microsoft.Compute";
    pub const NETWORK: &str = "Microsoft.Network";

    pub const VIRTUAL_MACHINES: &str = "virtualMachines";
    pub const NETWORK_INTERFACES: &str = "networkInterfaces";
    pub const PUBLIC_IP_ADDRESSES: &str = "publicIPAddresses";
}

/// Headers used by the long-running operation protocol
pub mod headers {
    pub const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";
    pub const LOCATION: &str = "location";
    pub const RETRY_AFTER: &str = "retry-after";
}

/// Provisioning and async-operation states
pub mod states {
    pub const SUCCEEDED: &str = "Succeeded";
    pub const FAILED: &str = "Failed";
    pub const CANCELED: &str = "Canceled";

    /// Whether a provisioning/operation state will not change any more
    pub fn is_terminal(state: &str) -> bool {
        [SUCCEEDED, FAILED, CANCELED]
            .iter()
            .any(|s| s.eq_ignore_ascii_case(state))
    }

    pub fn is_success(state: &str) -> bool {
        state.eq_ignore_ascii_case(SUCCEEDED)
    }
}

/// OAuth2 v2.0 token endpoint for a tenant
pub fn token_endpoint(authority_host: &str, tenant_id: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        authority_host.trim_end_matches('/'),
        tenant_id
    )
}

/// Client-credential scope for the Resource Manager audience
pub fn token_scope(resource_manager: &str) -> String {
    format!("{}/.default", resource_manager.trim_end_matches('/'))
}

/// List resource groups in a subscription
pub fn resource_groups_url(base_url: &str, subscription_id: &str) -> String {
    format!(
        "{}/subscriptions/{}/resourcegroups?api-version={}",
        base_url, subscription_id, RESOURCES_API_VERSION
    )
}

/// Collection of a provider's resources within a resource group
pub fn provider_collection_url(
    base_url: &str,
    subscription_id: &str,
    resource_group: &str,
    provider: &str,
    resource_type: &str,
    api_version: &str,
) -> String {
    format!(
        "{}/subscriptions/{}/resourceGroups/{}/providers/{}/{}?api-version={}",
        base_url, subscription_id, resource_group, provider, resource_type, api_version
    )
}

/// Single provider resource within a resource group
pub fn provider_resource_url(
    base_url: &str,
    subscription_id: &str,
    resource_group: &str,
    provider: &str,
    resource_type: &str,
    name: &str,
    api_version: &str,
) -> String {
    format!(
        "{}/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}?api-version={}",
        base_url, subscription_id, resource_group, provider, resource_type, name, api_version
    )
}

/// Last path segment of an ARM resource id, which is the resource name
pub fn resource_name_from_id(id: &str) -> Option<&str> {
    id.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_from_id() {
        let id = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/networkInterfaces/vm-nic";
        assert_eq!(resource_name_from_id(id), Some("vm-nic"));
        assert_eq!(resource_name_from_id("plain-name"), Some("plain-name"));
        assert_eq!(resource_name_from_id(""), None);
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            token_endpoint("https://login.microsoftonline.com/", "tenant"),
            "https://login.microsoftonline.com/tenant/oauth2/v2.0/token"
        );
        assert_eq!(
            token_scope("https://management.azure.com/"),
            "https://management.azure.com/.default"
        );
        assert_eq!(
            provider_resource_url(
                "https://management.azure.com",
                "sub",
                "rg",
                providers::NETWORK,
                providers::PUBLIC_IP_ADDRESSES,
                "ip",
                NETWORK_API_VERSION
            ),
            "https://management.azure.com/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/publicIPAddresses/ip?api-version=2023-05-01"
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(states::is_terminal("Succeeded"));
        assert!(states::is_terminal("canceled"));
        assert!(!states::is_terminal("Updating"));
        assert!(states::is_success("succeeded"));
        assert!(!states::is_success("Failed"));
    }
}
