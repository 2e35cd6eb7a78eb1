use super::client::ArmClient;
use super::constants;
use super::error::Result;
use super::models::ResourceGroup;

/// Microsoft.Resources facade
#[derive(Clone)]
pub struct ResourceClient {
    client: ArmClient,
}

impl ResourceClient {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    pub async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>> {
        let url = constants::resource_groups_url(self.client.base_url(), self.client.subscription_id());
        self.client.list_all(&url).await
    }
}
