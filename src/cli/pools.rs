//! `bigip pool` commands

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use super::output::{self, OutputFormat};
use super::read_json_file;
use crate::client::BigIp;
use crate::resources::{Pool, PoolMember};

#[derive(Subcommand)]
pub enum PoolCommands {
    /// List LTM pools with their members
    #[command(after_help = "EXAMPLES:\n    bigip pool list\n    bigip pool list --output yaml")]
    List {
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show one pool
    #[command(after_help = "EXAMPLES:\n    bigip pool get /Common/web_pool")]
    Get {
        /// Pool name or full path
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },

    /// Create a pool from a JSON file
    #[command(
        long_about = "Create an LTM pool from a JSON document using appliance field names.\n\nMembers listed under `membersReference.items` are created with the pool.",
        after_help = "EXAMPLES:\n    bigip pool create --file web_pool.json"
    )]
    Create {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete a pool
    Delete {
        #[arg(value_name = "NAME")]
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Add a member (`<node>:<port>`) to a pool
    #[command(after_help = "EXAMPLES:\n    bigip pool add-member web_pool 10.0.0.11:80")]
    AddMember {
        pool: String,

        /// Member name, `<address>:<port>`
        member: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a member from a pool
    RemoveMember {
        pool: String,
        member: String,
    },
}

pub async fn handle_pool_command(command: PoolCommands, bigip: &BigIp) -> Result<()> {
    match command {
        PoolCommands::List { output } => {
            let pools = bigip.pools().await.context("Failed to list pools")?;
            match output {
                OutputFormat::Table => print_pools_table(&pools),
                other => output::print_output(&pools, other)?,
            }
        }
        PoolCommands::Get { name, output } => {
            let pool = bigip
                .get_pool(&name)
                .await?
                .with_context(|| format!("Pool '{}' not found", name))?;
            match output {
                OutputFormat::Table => print_pools_table(std::slice::from_ref(&pool)),
                other => output::print_output(&pool, other)?,
            }
        }
        PoolCommands::Create { file } => {
            let pool: Pool = read_json_file(&file)?;
            bigip.create_pool(&pool).await?;
            println!("Pool '{}' created", pool.name);
        }
        PoolCommands::Delete { name, yes } => {
            if !output::confirm(&format!("Delete pool '{}'?", name), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            bigip.delete_pool(&name).await?;
            println!("Pool '{}' deleted", name);
        }
        PoolCommands::AddMember { pool, member, description } => {
            let member = PoolMember { name: member, description, ..Default::default() };
            bigip.add_pool_member(&pool, &member).await?;
            println!("Member '{}' added to pool '{}'", member.name, pool);
        }
        PoolCommands::RemoveMember { pool, member } => {
            bigip.delete_pool_member(&pool, &member).await?;
            println!("Member '{}' removed from pool '{}'", member, pool);
        }
    }

    Ok(())
}

fn print_pools_table(pools: &[Pool]) {
    if pools.is_empty() {
        println!("No pools found");
        return;
    }

    output::print_table_header(&[("Name", 32), ("LB Mode", 20), ("Monitor", 24), ("Members", 7)]);
    for pool in pools {
        println!(
            "{:<32} {:<20} {:<24} {:<7}",
            output::truncate(pool.full_path.as_deref().unwrap_or(&pool.name), 32),
            pool.load_balancing_mode.as_deref().unwrap_or("-"),
            output::truncate(pool.monitor.as_deref().unwrap_or("-"), 24),
            pool.members.len()
        );
    }
    println!();
}
