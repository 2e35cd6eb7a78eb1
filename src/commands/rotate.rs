//! Public IP rotation
//!
//! Runs inspect → detach → allocate → attach → report against one VM. Each
//! mutation is waited on before the next step starts. Nothing is rolled back:
//! if attaching fails after the old address was detached, the interface is
//! left without a public IP and the run has to be repeated.

use crate::api::constants::resource_name_from_id;
use crate::api::models::{NetworkInterface, PublicIpAddress, SubResource};
use crate::api::{ComputeClient, NetworkClient};
use crate::cli::ui::with_spinner;
use anyhow::{Context, Result, anyhow};
use colored::*;
use log::{info, warn};

/// Name for the address allocated by a run started at `timestamp`
pub fn new_public_ip_name(vm_name: &str, timestamp: i64) -> String {
    format!("{}-ip-{}", vm_name, timestamp)
}

/// What a successful rotation changed
#[derive(Debug, Clone, PartialEq)]
pub struct RotationOutcome {
    pub nic_name: String,
    pub ip_config_name: String,
    pub location: String,
    /// Name of the public IP that was detached, if one was bound
    pub previous_ip: Option<String>,
    pub new_ip_name: String,
    pub new_ip_address: Option<String>,
}

/// Primary interface state recorded by the inspect step
struct NicContext {
    nic_name: String,
    location: String,
    ip_config_name: String,
    nic: NetworkInterface,
}

pub async fn rotate_public_ip(
    compute: &ComputeClient,
    network: &NetworkClient,
    resource_group: &str,
    vm_name: &str,
    timestamp: i64,
) -> Result<RotationOutcome> {
    let new_ip_name = new_public_ip_name(vm_name, timestamp);
    info!("Rotating public IP of {}/{} to {}", resource_group, vm_name, new_ip_name);

    let context = inspect(compute, network, resource_group, vm_name).await?;
    let previous_ip = detach(network, resource_group, &context).await?;
    let new_ip = allocate(network, resource_group, &new_ip_name, &context.location).await?;
    attach(network, resource_group, &context.nic_name, &new_ip).await?;
    let new_ip_address = report(network, resource_group, &new_ip_name).await?;

    Ok(RotationOutcome {
        nic_name: context.nic_name,
        ip_config_name: context.ip_config_name,
        location: context.location,
        previous_ip,
        new_ip_name,
        new_ip_address,
    })
}

async fn inspect(
    compute: &ComputeClient,
    network: &NetworkClient,
    resource_group: &str,
    vm_name: &str,
) -> Result<NicContext> {
    println!();
    println!("{}", "Fetching the virtual machine's network interface...".bright_blue());

    let vm = with_spinner(
        format!("Reading virtual machine {}", vm_name),
        compute.get_virtual_machine(resource_group, vm_name),
    )
    .await
    .with_context(|| format!("Failed to read virtual machine '{}'", vm_name))?;

    let nic_id = vm
        .primary_nic_id()
        .ok_or_else(|| anyhow!("Virtual machine '{}' has no network interfaces", vm_name))?;
    let nic_name = resource_name_from_id(nic_id)
        .ok_or_else(|| anyhow!("Malformed network interface id '{}'", nic_id))?
        .to_string();
    println!("  Network interface: {}", nic_name.cyan());

    let nic = with_spinner(
        format!("Reading network interface {}", nic_name),
        network.get_network_interface(resource_group, &nic_name),
    )
    .await
    .with_context(|| format!("Failed to read network interface '{}'", nic_name))?;

    let ip_config_name = nic
        .primary_ip_configuration()
        .ok_or_else(|| anyhow!("Network interface '{}' has no IP configurations", nic_name))?
        .name
        .clone();
    let location = nic.location.clone();

    println!("  Location: {}", location.cyan());
    println!("  IP configuration: {}", ip_config_name.cyan());

    Ok(NicContext {
        nic_name,
        location,
        ip_config_name,
        nic,
    })
}

/// Clear the public IP of the primary configuration; returns its name
async fn detach(
    network: &NetworkClient,
    resource_group: &str,
    context: &NicContext,
) -> Result<Option<String>> {
    println!();
    println!("{}", "Detaching the current public IP...".bright_blue());

    let mut nic = context.nic.clone();
    let Some(config) = nic.primary_ip_configuration_mut() else {
        return Err(anyhow!("Network interface '{}' has no IP configurations", context.nic_name));
    };

    let Some(old_ip) = config.properties.public_ip_address.take() else {
        warn!("{} has no public IP bound, skipping detach", context.nic_name);
        println!(
            "  {}",
            "⚠ The virtual machine has no public IP; a new one will be created directly."
                .bright_yellow()
        );
        return Ok(None);
    };

    let old_ip_name = old_ip.name().to_string();
    println!("  Current public IP: {}", old_ip_name.cyan());

    with_spinner(format!("Detaching {}", old_ip_name), async {
        network
            .begin_create_or_update_network_interface(resource_group, &context.nic_name, &nic)
            .await?
            .wait()
            .await
    })
    .await
    .with_context(|| format!("Failed to detach public IP '{}'", old_ip_name))?;

    info!("Detached {} from {}", old_ip_name, context.nic_name);
    println!("  {} {}", "✓ Detached".bright_green(), old_ip_name);
    Ok(Some(old_ip_name))
}

async fn allocate(
    network: &NetworkClient,
    resource_group: &str,
    name: &str,
    location: &str,
) -> Result<PublicIpAddress> {
    println!();
    println!("{} {}", "Creating new public IP:".bright_blue(), name.cyan());

    let body = PublicIpAddress::new_static(location);
    let created: PublicIpAddress = with_spinner(format!("Provisioning {}", name), async {
        network
            .begin_create_or_update_public_ip_address(resource_group, name, &body)
            .await?
            .result::<PublicIpAddress>()
            .await
    })
    .await
    .with_context(|| format!("Failed to create public IP '{}'", name))?;

    info!("Created public IP {} in {}", name, location);
    println!("  {}", "✓ Public IP created".bright_green());
    Ok(created)
}

async fn attach(
    network: &NetworkClient,
    resource_group: &str,
    nic_name: &str,
    new_ip: &PublicIpAddress,
) -> Result<()> {
    println!();
    println!("{}", "Attaching the new public IP to the network interface...".bright_blue());

    let new_ip_id = new_ip
        .id
        .clone()
        .ok_or_else(|| anyhow!("Public IP '{}' was created without an id", new_ip.display_name()))?;

    // Work on a fresh copy; the one read during inspect is stale after detach
    let mut nic = with_spinner(
        format!("Reading network interface {}", nic_name),
        network.get_network_interface(resource_group, nic_name),
    )
    .await
    .with_context(|| format!("Failed to read network interface '{}'", nic_name))?;

    let config = nic
        .primary_ip_configuration_mut()
        .ok_or_else(|| anyhow!("Network interface '{}' has no IP configurations", nic_name))?;
    config.properties.public_ip_address = Some(SubResource::new(new_ip_id));

    with_spinner(format!("Attaching {}", new_ip.display_name()), async {
        network
            .begin_create_or_update_network_interface(resource_group, nic_name, &nic)
            .await?
            .wait()
            .await
    })
    .await
    .with_context(|| format!("Failed to attach public IP '{}'", new_ip.display_name()))?;

    info!("Attached {} to {}", new_ip.display_name(), nic_name);
    Ok(())
}

async fn report(network: &NetworkClient, resource_group: &str, name: &str) -> Result<Option<String>> {
    let ip = network
        .get_public_ip_address(resource_group, name)
        .await
        .with_context(|| format!("Failed to read public IP '{}'", name))?;
    let address = ip.properties.ip_address.clone();

    println!();
    println!("{}", "==========================================".bright_green());
    println!("{}", "Public IP rotation complete!".bright_green().bold());
    println!("New public IP name:    {}", name.bright_white().bold());
    println!(
        "New public IP address: {}",
        address.as_deref().unwrap_or("(not yet assigned)").bright_white().bold()
    );
    println!("{}", "==========================================".bright_green());

    info!("New public IP {} has address {:?}", name, address);
    Ok(address)
}
