//! Resource Manager wire models
//!
//! Only the fields the rotation touches are modelled. Resources that are sent
//! back with PUT keep every other field in a flattened map so an update never
//! drops settings this tool does not know about.

use super::constants::resource_name_from_id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a list response
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

/// Reference to another resource by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubResource {
    pub id: String,
}

impl SubResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn name(&self) -> &str {
        resource_name_from_id(&self.id).unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceGroup {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VirtualMachine {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub properties: VirtualMachineProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    #[serde(default)]
    pub network_profile: Option<NetworkProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default)]
    pub network_interfaces: Vec<SubResource>,
}

impl VirtualMachine {
    /// Id of the first network interface attached to the VM
    pub fn primary_nic_id(&self) -> Option<&str> {
        self.properties
            .network_profile
            .as_ref()?
            .network_interfaces
            .first()
            .map(|nic| nic.id.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    #[serde(default)]
    pub properties: NetworkInterfaceProperties,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInterfaceProperties {
    #[serde(rename = "ipConfigurations", default)]
    pub ip_configurations: Vec<IpConfiguration>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub properties: IpConfigurationProperties,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpConfigurationProperties {
    #[serde(
        rename = "publicIPAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_ip_address: Option<SubResource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkInterface {
    pub fn primary_ip_configuration(&self) -> Option<&IpConfiguration> {
        self.properties.ip_configurations.first()
    }

    pub fn primary_ip_configuration_mut(&mut self) -> Option<&mut IpConfiguration> {
        self.properties.ip_configurations.first_mut()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicIpAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(default)]
    pub properties: PublicIpProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpProperties {
    #[serde(
        rename = "publicIPAllocationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allocation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configuration: Option<SubResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

impl PublicIpAddress {
    /// Request body for a Standard SKU address with static allocation
    pub fn new_static(location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            location: location.into(),
            sku: Some(Sku {
                name: "Standard".to_string(),
                tier: None,
            }),
            properties: PublicIpProperties {
                allocation_method: Some("Static".to_string()),
                ..Default::default()
            },
        }
    }

    /// Not referenced by any IP configuration
    pub fn is_orphan(&self) -> bool {
        self.properties.ip_configuration.is_none()
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.id.as_deref().and_then(resource_name_from_id))
            .unwrap_or("<unnamed>")
    }
}

/// Body returned by an Azure-AsyncOperation status URL
#[derive(Debug, Clone, Deserialize)]
pub struct AsyncOperationStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
