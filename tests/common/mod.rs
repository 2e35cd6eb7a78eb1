//! Shared fixtures for the mock Resource Manager

#![allow(dead_code)]

use az_ip_rotate::api::ArmClient;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::{MockServer, Request};

pub const SUBSCRIPTION: &str = "sub-1";
pub const RESOURCE_GROUP: &str = "rg-1";
pub const TOKEN: &str = "test-token";

pub fn arm_client(server: &MockServer) -> ArmClient {
    ArmClient::new(server.uri(), SUBSCRIPTION, TOKEN, reqwest::Client::new())
        .with_poll_interval(Duration::from_millis(10))
}

pub fn rg_path() -> String {
    format!("/subscriptions/{}/resourceGroups/{}", SUBSCRIPTION, RESOURCE_GROUP)
}

pub fn vm_path(name: &str) -> String {
    format!("{}/providers/Microsoft.Compute/virtualMachines/{}", rg_path(), name)
}

pub fn nic_path(name: &str) -> String {
    format!("{}/providers/Microsoft.Network/networkInterfaces/{}", rg_path(), name)
}

pub fn public_ips_path() -> String {
    format!("{}/providers/Microsoft.Network/publicIPAddresses", rg_path())
}

pub fn public_ip_path(name: &str) -> String {
    format!("{}/{}", public_ips_path(), name)
}

pub fn vm_body(name: &str, nic_name: &str) -> Value {
    json!({
        "id": vm_path(name),
        "name": name,
        "location": "westeurope",
        "properties": {
            "networkProfile": {
                "networkInterfaces": [
                    { "id": nic_path(nic_name), "properties": { "primary": true } }
                ]
            }
        }
    })
}

pub fn nic_body(name: &str, public_ip: Option<&str>) -> Value {
    let mut ip_properties = json!({
        "privateIPAddress": "10.0.0.4",
        "privateIPAllocationMethod": "Dynamic",
        "subnet": { "id": format!("{}/providers/Microsoft.Network/virtualNetworks/vnet/subnets/default", rg_path()) }
    });
    if let Some(ip) = public_ip {
        ip_properties["publicIPAddress"] = json!({ "id": public_ip_path(ip) });
    }

    json!({
        "id": nic_path(name),
        "name": name,
        "location": "westeurope",
        "tags": { "owner": "ops" },
        "properties": {
            "provisioningState": "Succeeded",
            "enableAcceleratedNetworking": true,
            "ipConfigurations": [{
                "id": format!("{}/ipConfigurations/ipconfig1", nic_path(name)),
                "name": "ipconfig1",
                "properties": ip_properties
            }]
        }
    })
}

pub fn public_ip_body(name: &str, address: Option<&str>, bound_to: Option<&str>) -> Value {
    let mut properties = json!({
        "provisioningState": "Succeeded",
        "publicIPAllocationMethod": "Static"
    });
    if let Some(address) = address {
        properties["ipAddress"] = json!(address);
    }
    if let Some(config) = bound_to {
        properties["ipConfiguration"] = json!({ "id": config });
    }

    json!({
        "id": public_ip_path(name),
        "name": name,
        "location": "westeurope",
        "sku": { "name": "Standard" },
        "properties": properties
    })
}

/// Requests the server saw for a method and path, in arrival order
pub async fn requests_to(server: &MockServer, method: &str, path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == method && r.url.path() == path)
        .collect()
}

pub fn json_body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}
