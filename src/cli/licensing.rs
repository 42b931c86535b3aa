//! `bigip license` commands (run against a BIG-IQ license manager)

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::{self, OutputFormat};
use crate::client::BigIp;
use crate::config::PollConfig;
use crate::licensing::{LicenseAssignment, LicenseMember};

#[derive(Subcommand)]
pub enum LicenseCommands {
    /// List regkey pools
    Pools {
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// License a device from a regkey offering
    #[command(after_help = "EXAMPLES:\n    bigip license assign --pool lab_pool --regkey ABCDE-FGHIJ --device 10.1.1.4 --device-user admin --device-password secret --wait")]
    Assign {
        /// Regkey pool name
        #[arg(long)]
        pool: String,

        #[arg(long)]
        regkey: String,

        /// Management address of the device to license
        #[arg(long)]
        device: String,

        #[arg(long)]
        device_user: Option<String>,

        #[arg(long)]
        device_password: Option<String>,

        /// Wait until the license is installed
        #[arg(long)]
        wait: bool,
    },

    /// Show a license member
    Status {
        #[arg(long)]
        pool: String,

        #[arg(long)]
        regkey: String,

        member: String,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Revoke a license member
    Revoke {
        #[arg(long)]
        pool: String,

        #[arg(long)]
        regkey: String,

        member: String,

        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_license_command(command: LicenseCommands, bigip: &BigIp, poll: &PollConfig) -> Result<()> {
    match command {
        LicenseCommands::Pools { output } => {
            let pools = bigip.list_regkey_pools().await?;
            match output {
                OutputFormat::Table => {
                    output::print_table_header(&[("Name", 30), ("Id", 38)]);
                    for pool in &pools {
                        println!("{:<30} {}", output::truncate(&pool.name, 30), pool.id);
                    }
                    println!();
                }
                other => output::print_output(&pools, other)?,
            }
        }
        LicenseCommands::Assign { pool, regkey, device, device_user, device_password, wait } => {
            let pool_id = bigip.regkey_pool_id(&pool).await?;
            let assignment = LicenseAssignment {
                device_address: device,
                username: device_user,
                password: device_password,
                ..Default::default()
            };

            let member = bigip.assign_license(&pool_id, &regkey, &assignment).await?;
            let member = if wait {
                bigip
                    .poll_license_member(&pool_id, &regkey, &member.id, poll)
                    .await
                    .context("License installation did not complete")?
            } else {
                member
            };
            print_members(&[member]);
        }
        LicenseCommands::Status { pool, regkey, member, output } => {
            let pool_id = bigip.regkey_pool_id(&pool).await?;
            let member = bigip
                .license_member(&pool_id, &regkey, &member)
                .await?
                .with_context(|| format!("License member '{}' not found", member))?;
            match output {
                OutputFormat::Table => print_members(&[member]),
                other => output::print_output(&member, other)?,
            }
        }
        LicenseCommands::Revoke { pool, regkey, member, yes } => {
            if !output::confirm(&format!("Revoke license member '{}'?", member), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            let pool_id = bigip.regkey_pool_id(&pool).await?;
            bigip.revoke_license(&pool_id, &regkey, &member).await?;
            println!("License member '{}' revoked", member);
        }
    }

    Ok(())
}

fn print_members(members: &[LicenseMember]) {
    output::print_table_header(&[("Member", 38), ("Device", 20), ("Status", 20)]);
    for member in members {
        println!(
            "{:<38} {:<20} {}",
            member.id,
            member.device_address.as_deref().unwrap_or("-"),
            member.status
        );
    }
    println!();
}
