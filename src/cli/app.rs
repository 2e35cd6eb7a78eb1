use clap::Parser;

/// Rotate the public IP address of an Azure virtual machine.
///
/// Accounts are read from /config/azure.conf, or my_azure_creds.conf next to
/// the executable. Everything else is chosen from interactive menus.
#[derive(Parser, Debug)]
#[command(name = "az-ip-rotate", version)]
#[command(about = "Rotate the public IP address of an Azure virtual machine")]
pub struct Cli {
    /// Exit right away instead of waiting for Enter when finished
    #[arg(long)]
    pub no_pause: bool,
}
