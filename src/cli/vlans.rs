//! `bigip vlan` commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::{self, OutputFormat};
use crate::client::BigIp;
use crate::resources::{Vlan, VlanInterface};

#[derive(Subcommand)]
pub enum VlanCommands {
    /// List VLANs
    List {
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show one VLAN with its interfaces
    Get {
        name: String,

        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },

    /// Create a VLAN
    #[command(after_help = "EXAMPLES:\n    bigip vlan create external --tag 4094 --interface 1.1\n    bigip vlan create internal --interface 1.2 --untagged")]
    Create {
        name: String,

        /// 802.1Q tag
        #[arg(long)]
        tag: Option<u16>,

        /// Interface to bind; repeatable
        #[arg(long = "interface", value_name = "IFACE")]
        interfaces: Vec<String>,

        /// Bind interfaces untagged
        #[arg(long)]
        untagged: bool,

        #[arg(long)]
        mtu: Option<u32>,
    },

    /// Delete a VLAN
    Delete {
        name: String,

        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_vlan_command(command: VlanCommands, bigip: &BigIp) -> Result<()> {
    match command {
        VlanCommands::List { output } => {
            let vlans = bigip.vlans().await.context("Failed to list VLANs")?;
            match output {
                OutputFormat::Table => print_vlans_table(&vlans),
                other => output::print_output(&vlans, other)?,
            }
        }
        VlanCommands::Get { name, output } => {
            let vlan = bigip
                .get_vlan(&name)
                .await?
                .with_context(|| format!("VLAN '{}' not found", name))?;
            match output {
                OutputFormat::Table => print_vlans_table(std::slice::from_ref(&vlan)),
                other => output::print_output(&vlan, other)?,
            }
        }
        VlanCommands::Create { name, tag, interfaces, untagged, mtu } => {
            let vlan = build_vlan(name, tag, interfaces, untagged, mtu);
            bigip.create_vlan(&vlan).await?;
            println!("VLAN '{}' created", vlan.name);
        }
        VlanCommands::Delete { name, yes } => {
            if !output::confirm(&format!("Delete VLAN '{}'?", name), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            bigip.delete_vlan(&name).await?;
            println!("VLAN '{}' deleted", name);
        }
    }

    Ok(())
}

fn build_vlan(name: String, tag: Option<u16>, interfaces: Vec<String>, untagged: bool, mtu: Option<u32>) -> Vlan {
    let interfaces = interfaces
        .into_iter()
        .map(|iface| VlanInterface {
            name: iface,
            tagged: (!untagged).then_some(true),
            untagged: untagged.then_some(true),
        })
        .collect();

    Vlan { name, tag, mtu, interfaces, ..Default::default() }
}

fn print_vlans_table(vlans: &[Vlan]) {
    if vlans.is_empty() {
        println!("No VLANs found");
        return;
    }

    output::print_table_header(&[("Name", 28), ("Tag", 6), ("MTU", 6), ("Interfaces", 30)]);
    for vlan in vlans {
        let interfaces: Vec<&str> = vlan.interfaces.iter().map(|i| i.name.as_str()).collect();
        println!(
            "{:<28} {:<6} {:<6} {}",
            output::truncate(&vlan.name, 28),
            vlan.tag.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()),
            vlan.mtu.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string()),
            interfaces.join(",")
        );
    }
    println!();
}
