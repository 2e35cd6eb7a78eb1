use super::auth;
use super::client::ArmClient;
use super::compute::ComputeClient;
use super::error::Result;
use super::network::NetworkClient;
use super::resources::ResourceClient;
use crate::config::{AccountCredential, CloudEndpoints};

/// Authenticated handles for one subscription
#[derive(Clone)]
pub struct CloudSession {
    pub resources: ResourceClient,
    pub compute: ComputeClient,
    pub network: NetworkClient,
}

impl CloudSession {
    /// Log in with the client-credential flow and build the three facades
    pub async fn connect(endpoints: &CloudEndpoints, credential: &AccountCredential) -> Result<Self> {
        let http_client = ArmClient::build_http_client()?;
        let token = auth::authenticate(&http_client, endpoints, credential).await?;

        let client = ArmClient::new(
            endpoints.resource_manager.as_str(),
            credential.subscription_id.as_str(),
            token.access_token,
            http_client,
        );
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: ArmClient) -> Self {
        Self {
            resources: ResourceClient::new(client.clone()),
            compute: ComputeClient::new(client.clone()),
            network: NetworkClient::new(client),
        }
    }
}
