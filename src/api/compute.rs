use super::client::ArmClient;
use super::constants::{self, COMPUTE_API_VERSION, providers};
use super::error::Result;
use super::models::VirtualMachine;

/// Microsoft.Compute facade
#[derive(Clone)]
pub struct ComputeClient {
    client: ArmClient,
}

impl ComputeClient {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    pub async fn list_virtual_machines(&self, resource_group: &str) -> Result<Vec<VirtualMachine>> {
        let url = constants::provider_collection_url(
            self.client.base_url(),
            self.client.subscription_id(),
            resource_group,
            providers::COMPUTE,
            providers::VIRTUAL_MACHINES,
            COMPUTE_API_VERSION,
        );
        self.client.list_all(&url).await
    }

    pub async fn get_virtual_machine(&self, resource_group: &str, name: &str) -> Result<VirtualMachine> {
        let url = constants::provider_resource_url(
            self.client.base_url(),
            self.client.subscription_id(),
            resource_group,
            providers::COMPUTE,
            providers::VIRTUAL_MACHINES,
            name,
            COMPUTE_API_VERSION,
        );
        self.client.get_json(&url).await
    }
}
