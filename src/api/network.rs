use super::client::ArmClient;
use super::constants::{self, NETWORK_API_VERSION, providers};
use super::error::Result;
use super::models::{NetworkInterface, PublicIpAddress};
use super::poller::LongRunningOperation;

/// Microsoft.Network facade for network interfaces and public IPs
#[derive(Clone)]
pub struct NetworkClient {
    client: ArmClient,
}

impl NetworkClient {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    fn resource_url(&self, resource_group: &str, resource_type: &str, name: &str) -> String {
        constants::provider_resource_url(
            self.client.base_url(),
            self.client.subscription_id(),
            resource_group,
            providers::NETWORK,
            resource_type,
            name,
            NETWORK_API_VERSION,
        )
    }

    pub async fn get_network_interface(&self, resource_group: &str, name: &str) -> Result<NetworkInterface> {
        let url = self.resource_url(resource_group, providers::NETWORK_INTERFACES, name);
        self.client.get_json(&url).await
    }

    /// Replace a network interface; wait on the returned operation
    pub async fn begin_create_or_update_network_interface(
        &self,
        resource_group: &str,
        name: &str,
        nic: &NetworkInterface,
    ) -> Result<LongRunningOperation> {
        let url = self.resource_url(resource_group, providers::NETWORK_INTERFACES, name);
        self.client.begin_put(&url, nic).await
    }

    pub async fn get_public_ip_address(&self, resource_group: &str, name: &str) -> Result<PublicIpAddress> {
        let url = self.resource_url(resource_group, providers::PUBLIC_IP_ADDRESSES, name);
        self.client.get_json(&url).await
    }

    pub async fn begin_create_or_update_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
        public_ip: &PublicIpAddress,
    ) -> Result<LongRunningOperation> {
        let url = self.resource_url(resource_group, providers::PUBLIC_IP_ADDRESSES, name);
        self.client.begin_put(&url, public_ip).await
    }

    pub async fn list_public_ip_addresses(&self, resource_group: &str) -> Result<Vec<PublicIpAddress>> {
        let url = constants::provider_collection_url(
            self.client.base_url(),
            self.client.subscription_id(),
            resource_group,
            providers::NETWORK,
            providers::PUBLIC_IP_ADDRESSES,
            NETWORK_API_VERSION,
        );
        self.client.list_all(&url).await
    }

    pub async fn begin_delete_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<LongRunningOperation> {
        let url = self.resource_url(resource_group, providers::PUBLIC_IP_ADDRESSES, name);
        self.client.begin_delete(&url).await
    }
}
