use anyhow::{Context, Result};
use az_ip_rotate::api::CloudSession;
use az_ip_rotate::cli::Cli;
use az_ip_rotate::cli::ui::with_spinner;
use az_ip_rotate::commands::{rotate_public_ip, sweep_orphaned_ips};
use az_ip_rotate::config::{CloudEndpoints, Config};
use az_ip_rotate::ui::{select_from_list, wait_for_enter};
use clap::Parser;
use colored::*;
use is_terminal::IsTerminal;
use log::{error, info};
use std::process::ExitCode;

const LOG_FILE: &str = "az-ip-rotate.log";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    info!("Starting az-ip-rotate");

    let code = match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run aborted: {:#}", e);
            println!();
            println!("{} {:#}", "An unexpected error occurred:".bright_red().bold(), e);
            println!("{}", "Aborted.".bright_red());
            ExitCode::from(1)
        }
    };

    if !cli.no_pause && std::io::stdin().is_terminal() {
        let _ = wait_for_enter("Press Enter to exit...");
    }
    code
}

/// Log to a file truncated on each run, falling back to stderr
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE)
    {
        Ok(log_file) => {
            builder.target(env_logger::Target::Pipe(Box::new(log_file)));
        }
        Err(e) => {
            eprintln!("Warning: cannot open {} ({}), logging to stderr", LOG_FILE, e);
        }
    }

    builder.init();
}

async fn run() -> Result<()> {
    let config = Config::load()?;
    println!("Found config file: {}, loading...", config.path.display());

    let account = select_from_list(&config.accounts, "Azure accounts", |a| a.display_name())?;
    let credential = account.credential()?;
    println!("Selected account: {}", credential.display_name.bright_green());

    println!();
    println!("Signing in to Azure with the service principal...");
    let endpoints = CloudEndpoints::from_env();
    let session = with_spinner("Authenticating", CloudSession::connect(&endpoints, &credential))
        .await
        .context("Login failed, check the credentials of the selected account")?;
    println!("{}", "✓ Signed in.".bright_green());

    let resource_groups: Vec<String> =
        with_spinner("Listing resource groups", session.resources.list_resource_groups())
            .await
            .context("Failed to list resource groups")?
            .into_iter()
            .map(|group| group.name)
            .collect();
    let resource_group = select_from_list(&resource_groups, "resource groups", |name| name.clone())?;
    println!("Selected resource group: {}", resource_group.bright_green());

    let vms: Vec<String> = with_spinner(
        "Listing virtual machines",
        session.compute.list_virtual_machines(resource_group),
    )
    .await
    .with_context(|| format!("Failed to list virtual machines in '{}'", resource_group))?
    .into_iter()
    .map(|vm| vm.name)
    .collect();
    let vm_name = select_from_list(&vms, "virtual machines", |name| name.clone())?;
    println!("Selected virtual machine: {}", vm_name.bright_green());

    let timestamp = chrono::Utc::now().timestamp();
    rotate_public_ip(&session.compute, &session.network, resource_group, vm_name, timestamp).await?;

    let report = sweep_orphaned_ips(&session.network, resource_group).await?;
    if !report.failed.is_empty() {
        info!("{} orphaned public IP(s) could not be deleted", report.failed.len());
    }

    println!();
    println!("{}", "==========================================".bright_green());
    println!("{}", "All done!".bright_green().bold());
    println!("{}", "==========================================".bright_green());
    Ok(())
}
