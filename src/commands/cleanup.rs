//! Orphaned public IP cleanup
//!
//! A public IP without an IP-configuration back-reference is not bound to
//! any interface. Every such address in the resource group is deleted; one
//! failed delete is reported and the sweep moves on.

use crate::api::NetworkClient;
use crate::cli::ui::with_spinner;
use anyhow::{Context, Result};
use colored::*;
use log::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanupReport {
    pub deleted: Vec<String>,
    /// Name and error message of each orphan that could not be deleted
    pub failed: Vec<(String, String)>,
}

pub async fn sweep_orphaned_ips(network: &NetworkClient, resource_group: &str) -> Result<CleanupReport> {
    println!();
    println!(
        "{}",
        "Looking for unattached public IPs in the resource group...".bright_blue()
    );

    let public_ips = with_spinner(
        "Listing public IPs",
        network.list_public_ip_addresses(resource_group),
    )
    .await
    .with_context(|| format!("Failed to list public IPs in '{}'", resource_group))?;

    let orphans: Vec<String> = public_ips
        .iter()
        .filter(|ip| ip.is_orphan())
        .map(|ip| ip.display_name().to_string())
        .collect();

    let mut report = CleanupReport::default();
    if orphans.is_empty() {
        println!("  No unattached public IPs found.");
        return Ok(report);
    }

    println!("  Deleting the following unattached public IPs:");
    for name in orphans {
        println!("   - {}", name);

        let result = with_spinner(format!("Deleting {}", name), async {
            network
                .begin_delete_public_ip_address(resource_group, &name)
                .await?
                .wait()
                .await
        })
        .await;

        match result {
            Ok(()) => {
                info!("Deleted orphaned public IP {}", name);
                println!("     {} {}", "✓ Deleted".bright_green(), name);
                report.deleted.push(name);
            }
            Err(e) => {
                warn!("Failed to delete public IP {}: {}", name, e);
                println!(
                    "     {}",
                    format!("⚠ Failed to delete public IP '{}': {}", name, e).bright_yellow()
                );
                report.failed.push((name, e.to_string()));
            }
        }
    }

    Ok(report)
}
