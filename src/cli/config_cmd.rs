//! `bigip config` commands for managing ~/.bigip/config.toml

use anyhow::{Context, Result};
use clap::Subcommand;

use super::config::CliConfig;
use super::output::{self, OutputFormat};

const KEYS: &str = "host, port, username, password, token_auth, timeout, insecure";

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create an empty profile file
    Init {
        /// Overwrite an existing profile
        #[arg(short, long)]
        force: bool,
    },

    /// Show the current profile (password masked)
    Show {
        #[arg(short, long, value_enum, default_value = "yaml")]
        output: OutputFormat,
    },

    /// Set one profile value
    #[command(after_help = "EXAMPLES:\n    bigip config set host 10.1.1.4\n    bigip config set token_auth true\n    bigip config set timeout 60")]
    Set {
        /// Profile key (host, port, username, password, token_auth, timeout, insecure)
        key: String,

        value: String,
    },

    /// Print the profile path
    Path,
}

pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => init_config(force),
        ConfigCommands::Show { output } => show_config(output),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => {
            println!("{}", CliConfig::config_path()?.display());
            Ok(())
        }
    }
}

fn init_config(force: bool) -> Result<()> {
    let path = CliConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    CliConfig::default().save()?;

    println!("Configuration file created at: {}", path.display());
    println!("\nSet connection values with:");
    println!("  bigip config set host <address>");
    println!("  bigip config set username <user>");
    println!("  bigip config set password <password>");
    Ok(())
}

fn show_config(format: OutputFormat) -> Result<()> {
    let path = CliConfig::config_path()?;
    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'bigip config init' to create one");
        return Ok(());
    }

    let mut config = CliConfig::load()?;
    if config.password.is_some() {
        config.password = Some("********".to_string());
    }

    match format {
        OutputFormat::Table => print_config_table(&config),
        other => output::print_output(&config, other)?,
    }
    Ok(())
}

/// Apply `key = value` to a profile
pub fn apply_setting(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "host" => config.host = Some(value.to_string()),
        "port" => config.port = Some(value.parse().context("Invalid port. Must be 1-65535")?),
        "username" => config.username = Some(value.to_string()),
        "password" => config.password = Some(value.to_string()),
        "token_auth" => {
            config.token_auth = Some(value.parse().context("Invalid token_auth. Use true or false")?)
        }
        "timeout" => {
            config.timeout =
                Some(value.parse().context("Invalid timeout value. Must be a number in seconds")?)
        }
        "insecure" => {
            config.insecure = Some(value.parse().context("Invalid insecure. Use true or false")?)
        }
        _ => anyhow::bail!("Unknown configuration key: '{}'. Valid keys: {}", key, KEYS),
    }
    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load().unwrap_or_default();
    apply_setting(&mut config, key, value)?;
    config.save()?;

    println!("Set {} in {}", key, CliConfig::config_path()?.display());
    Ok(())
}

fn print_config_table(config: &CliConfig) {
    fn show<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_else(|| "<not set>".to_string())
    }

    output::print_table_header(&[("Key", 12), ("Value", 40)]);
    println!("{:<12} {}", "host", show(&config.host));
    println!("{:<12} {}", "port", show(&config.port));
    println!("{:<12} {}", "username", show(&config.username));
    println!("{:<12} {}", "password", show(&config.password));
    println!("{:<12} {}", "token_auth", show(&config.token_auth));
    println!("{:<12} {}", "timeout", show(&config.timeout));
    println!("{:<12} {}", "insecure", show(&config.insecure));
    println!();
}
