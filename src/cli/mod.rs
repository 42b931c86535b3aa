//! # Command Line Interface
//!
//! Operator commands on top of the library: LTM pools, VLANs, AS3 tenants,
//! FAST applications, regkey licensing and iRules LX extension files.

pub mod as3;
pub mod config;
pub mod config_cmd;
pub mod fast;
pub mod ilx;
pub mod licensing;
pub mod output;
pub mod pools;
pub mod vlans;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::client::BigIp;
use crate::config::{BigIpConfig, LoggingConfig};
use crate::observability::init_logging;

#[derive(Parser)]
#[command(name = "bigip")]
#[command(about = "F5 BIG-IP management REST tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Management address of the appliance
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Management port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[arg(long, global = true)]
    pub username: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Log in for an X-F5-Auth-Token instead of using basic auth
    #[arg(long, global = true)]
    pub token_auth: bool,

    /// Accept self-signed appliance certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// LTM pool commands
    Pool {
        #[command(subcommand)]
        command: pools::PoolCommands,
    },

    /// VLAN commands
    Vlan {
        #[command(subcommand)]
        command: vlans::VlanCommands,
    },

    /// AS3 declaration commands
    As3 {
        #[command(subcommand)]
        command: as3::As3Commands,
    },

    /// FAST application commands
    Fast {
        #[command(subcommand)]
        command: fast::FastCommands,
    },

    /// Regkey pool licensing commands
    License {
        #[command(subcommand)]
        command: licensing::LicenseCommands,
    },

    /// iRules LX workspace and extension commands
    Ilx {
        #[command(subcommand)]
        command: ilx::IlxCommands,
    },

    /// Profile file commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

/// Run CLI commands
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose)?;

    let command = cli.command;
    if let Commands::Config { command } = command {
        return config_cmd::handle_config_command(command).await;
    }

    let settings = config::resolve_connection(config::ConnectionFlags {
        host: cli.host,
        port: cli.port,
        username: cli.username,
        password: cli.password,
        token_auth: cli.token_auth,
        insecure: cli.insecure,
        timeout: cli.timeout,
    })?;
    let bigip = connect(&settings).await?;

    match command {
        Commands::Pool { command } => pools::handle_pool_command(command, &bigip).await?,
        Commands::Vlan { command } => vlans::handle_vlan_command(command, &bigip).await?,
        Commands::As3 { command } => as3::handle_as3_command(command, &bigip).await?,
        Commands::Fast { command } => {
            fast::handle_fast_command(command, &bigip, &settings.poll).await?
        }
        Commands::License { command } => {
            licensing::handle_license_command(command, &bigip, &settings.poll).await?
        }
        Commands::Ilx { command } => ilx::handle_ilx_command(command, &bigip).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}

async fn connect(settings: &BigIpConfig) -> Result<BigIp> {
    BigIp::connect(settings)
        .await
        .with_context(|| format!("Failed to connect to {}", settings.base_url()))
}

fn initialise_logging(verbose: bool) -> Result<()> {
    let mut logging = LoggingConfig::from_env();
    if verbose {
        logging.log_level = "debug".to_string();
    }
    init_logging(&logging).context("Failed to initialise logging")
}

/// Read and decode a JSON document from disk
pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON from file: {}", path.display()))
}
