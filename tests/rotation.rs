//! Rotation engine against a mock Resource Manager

mod common;

use az_ip_rotate::api::CloudSession;
use az_ip_rotate::commands::{new_public_ip_name, rotate_public_ip, sweep_orphaned_ips};
use common::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VM: &str = "vm-1";
const NIC: &str = "vm-1-nic";
const TIMESTAMP: i64 = 1_700_000_000;

async fn mount_vm_and_nic(server: &MockServer, bound_ip: Option<&str>) {
    Mock::given(method("GET"))
        .and(path(vm_path(VM)))
        .and(query_param("api-version", "2023-03-01"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(vm_body(VM, NIC)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(nic_path(NIC)))
        .and(query_param("api-version", "2023-05-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nic_body(NIC, bound_ip)))
        .mount(server)
        .await;
}

async fn mount_new_ip(server: &MockServer, name: &str, address: &str) {
    let operation_url = format!("{}/operations/create-ip", server.uri());

    Mock::given(method("PUT"))
        .and(path(public_ip_path(name)))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Azure-AsyncOperation", operation_url.as_str())
                .set_body_json(json!({
                    "name": name,
                    "location": "westeurope",
                    "properties": { "provisioningState": "Updating" }
                })),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/operations/create-ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Succeeded" })))
        .mount(server)
        .await;

    let ip_config = format!("{}/ipConfigurations/ipconfig1", nic_path(NIC));
    Mock::given(method("GET"))
        .and(path(public_ip_path(name)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(public_ip_body(name, Some(address), Some(&ip_config))),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_rotation_replaces_bound_ip() {
    let server = MockServer::start().await;
    let new_ip = new_public_ip_name(VM, TIMESTAMP);

    mount_vm_and_nic(&server, Some("old-ip")).await;
    mount_new_ip(&server, &new_ip, "20.1.2.3").await;
    Mock::given(method("PUT"))
        .and(path(nic_path(NIC)))
        .respond_with(ResponseTemplate::new(200).set_body_json(nic_body(NIC, None)))
        .expect(2)
        .mount(&server)
        .await;

    let session = CloudSession::from_client(arm_client(&server));
    let outcome = rotate_public_ip(&session.compute, &session.network, RESOURCE_GROUP, VM, TIMESTAMP)
        .await
        .unwrap();

    assert_eq!(outcome.nic_name, NIC);
    assert_eq!(outcome.ip_config_name, "ipconfig1");
    assert_eq!(outcome.location, "westeurope");
    assert_eq!(outcome.previous_ip.as_deref(), Some("old-ip"));
    assert_eq!(outcome.new_ip_name, "vm-1-ip-1700000000");
    assert_eq!(outcome.new_ip_address.as_deref(), Some("20.1.2.3"));

    let nic_updates = requests_to(&server, "PUT", &nic_path(NIC)).await;
    assert_eq!(nic_updates.len(), 2);

    // Detach: reference cleared, everything else sent back untouched
    let detached = json_body(&nic_updates[0]);
    let detached_props = &detached["properties"]["ipConfigurations"][0]["properties"];
    assert!(detached_props.get("publicIPAddress").is_none());
    assert_eq!(detached_props["privateIPAddress"], "10.0.0.4");
    assert_eq!(detached["tags"]["owner"], "ops");
    assert_eq!(detached["properties"]["enableAcceleratedNetworking"], true);

    // Attach: exactly the new address
    let attached = json_body(&nic_updates[1]);
    assert_eq!(
        attached["properties"]["ipConfigurations"][0]["properties"]["publicIPAddress"],
        json!({ "id": public_ip_path(&new_ip) })
    );

    let created = requests_to(&server, "PUT", &public_ip_path(&new_ip)).await;
    assert_eq!(
        json_body(&created[0]),
        json!({
            "location": "westeurope",
            "sku": { "name": "Standard" },
            "properties": { "publicIPAllocationMethod": "Static" }
        })
    );
}

#[tokio::test]
async fn test_rotation_without_bound_ip_skips_detach() {
    let server = MockServer::start().await;
    let new_ip = new_public_ip_name(VM, TIMESTAMP);

    mount_vm_and_nic(&server, None).await;
    mount_new_ip(&server, &new_ip, "20.9.9.9").await;
    Mock::given(method("PUT"))
        .and(path(nic_path(NIC)))
        .respond_with(ResponseTemplate::new(200).set_body_json(nic_body(NIC, Some(&new_ip))))
        .expect(1)
        .mount(&server)
        .await;

    let session = CloudSession::from_client(arm_client(&server));
    let outcome = rotate_public_ip(&session.compute, &session.network, RESOURCE_GROUP, VM, TIMESTAMP)
        .await
        .unwrap();

    assert_eq!(outcome.previous_ip, None);
    assert_eq!(outcome.new_ip_address.as_deref(), Some("20.9.9.9"));

    let nic_updates = requests_to(&server, "PUT", &nic_path(NIC)).await;
    let attached = json_body(&nic_updates[0]);
    assert_eq!(
        attached["properties"]["ipConfigurations"][0]["properties"]["publicIPAddress"]["id"],
        public_ip_path(&new_ip)
    );
}

#[tokio::test]
async fn test_vm_without_network_interface_fails_fast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(vm_path(VM)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": VM,
            "properties": { "networkProfile": { "networkInterfaces": [] } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = CloudSession::from_client(arm_client(&server));
    let err = rotate_public_ip(&session.compute, &session.network, RESOURCE_GROUP, VM, TIMESTAMP)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("has no network interfaces"));
}

#[tokio::test]
async fn test_failed_allocation_aborts_before_attach() {
    let server = MockServer::start().await;
    let new_ip = new_public_ip_name(VM, TIMESTAMP);

    mount_vm_and_nic(&server, Some("old-ip")).await;
    Mock::given(method("PUT"))
        .and(path(nic_path(NIC)))
        .respond_with(ResponseTemplate::new(200).set_body_json(nic_body(NIC, None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(public_ip_path(&new_ip)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "PublicIPCountLimitReached",
                "message": "Cannot create more than 10 public IP addresses for this subscription in this region."
            }
        })))
        .mount(&server)
        .await;

    let session = CloudSession::from_client(arm_client(&server));
    let err = rotate_public_ip(&session.compute, &session.network, RESOURCE_GROUP, VM, TIMESTAMP)
        .await
        .unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Failed to create public IP 'vm-1-ip-1700000000'"));
    assert!(message.contains("PublicIPCountLimitReached"));
}

#[tokio::test]
async fn test_full_run_sweeps_previous_ip() {
    let server = MockServer::start().await;
    let new_ip = new_public_ip_name(VM, TIMESTAMP);
    let ip_config = format!("{}/ipConfigurations/ipconfig1", nic_path(NIC));

    mount_vm_and_nic(&server, Some("old-ip")).await;
    mount_new_ip(&server, &new_ip, "20.1.2.3").await;
    Mock::given(method("PUT"))
        .and(path(nic_path(NIC)))
        .respond_with(ResponseTemplate::new(200).set_body_json(nic_body(NIC, None)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(public_ips_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                public_ip_body("old-ip", Some("20.0.0.1"), None),
                public_ip_body(&new_ip, Some("20.1.2.3"), Some(&ip_config))
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(public_ip_path("old-ip")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(public_ip_path(&new_ip)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = CloudSession::from_client(arm_client(&server));
    rotate_public_ip(&session.compute, &session.network, RESOURCE_GROUP, VM, TIMESTAMP)
        .await
        .unwrap();
    let report = sweep_orphaned_ips(&session.network, RESOURCE_GROUP).await.unwrap();

    assert_eq!(report.deleted, vec!["old-ip".to_string()]);
    assert!(report.failed.is_empty());
}
