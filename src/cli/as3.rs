//! `bigip as3` commands

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use super::output::{self, OutputFormat};
use super::read_json_file;
use crate::as3::{As3Action, As3Context, As3Request};
use crate::client::BigIp;

#[derive(Subcommand)]
pub enum As3Commands {
    /// Deploy a declaration for one tenant
    #[command(
        long_about = "POST an AS3 declaration to /mgmt/shared/appsvcs/declare.\n\nThe declaration must define the tenant given with --tenant. Use --sample to deploy the built-in sample topology instead of a file.",
        after_help = "EXAMPLES:\n    bigip as3 deploy --tenant Sample_01 --file declaration.json\n    bigip as3 deploy --tenant Sample_01 --sample --dry-run"
    )]
    Deploy {
        #[arg(long)]
        tenant: String,

        /// Declaration file (`{"class": "AS3", ...}`)
        #[arg(short, long, value_name = "FILE", conflicts_with = "sample", required_unless_present = "sample")]
        file: Option<PathBuf>,

        /// Deploy the sample HTTP application
        #[arg(long)]
        sample: bool,

        /// Validate without applying
        #[arg(long)]
        dry_run: bool,

        /// Do not save the configuration after deploying
        #[arg(long)]
        no_persist: bool,
    },

    /// Print the sample declaration for a tenant
    Sample {
        #[arg(long, default_value = "Sample_01")]
        tenant: String,

        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },

    /// Show the declaration currently deployed for a tenant
    Get {
        tenant: String,

        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },

    /// Remove a tenant and everything it declares
    Delete {
        tenant: String,

        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_as3_command(command: As3Commands, bigip: &BigIp) -> Result<()> {
    match command {
        As3Commands::Deploy { tenant, file, sample: _, dry_run, no_persist } => {
            let request = match file {
                Some(path) => read_json_file::<As3Request>(&path)?,
                None => As3Request::sample(&tenant),
            };

            let mut ctx = As3Context::new(tenant);
            if dry_run {
                ctx = ctx.with_action(As3Action::DryRun);
            }
            if no_persist {
                ctx = ctx.with_persist(false);
            }

            let results = bigip.deploy_as3(&ctx, &request).await.context("AS3 deployment failed")?;
            for result in results {
                println!(
                    "{}: {} ({})",
                    result.tenant.as_deref().unwrap_or(&ctx.tenant),
                    result.message,
                    result.code
                );
            }
        }
        As3Commands::Sample { tenant, output } => {
            output::print_output(&As3Request::sample(&tenant), output)?;
        }
        As3Commands::Get { tenant, output } => {
            let declaration = bigip
                .get_as3_tenant(&tenant)
                .await?
                .with_context(|| format!("Tenant '{}' is not deployed", tenant))?;
            output::print_output(&declaration, output)?;
        }
        As3Commands::Delete { tenant, yes } => {
            if !output::confirm(&format!("Remove AS3 tenant '{}'?", tenant), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            bigip.delete_as3_tenant(&tenant).await?;
            println!("Tenant '{}' removed", tenant);
        }
    }

    Ok(())
}
