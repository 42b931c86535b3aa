//! `bigip fast` commands

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::output::{self, OutputFormat};
use super::read_json_file;
use crate::client::BigIp;
use crate::config::PollConfig;
use crate::fast::{FastApplication, FastParameters, FastTask};

#[derive(Subcommand)]
pub enum FastCommands {
    /// Render a template into a new application
    #[command(after_help = "EXAMPLES:\n    bigip fast create --template examples/simple_http --params params.json --wait")]
    Create {
        /// Template path (`<set>/<template>`)
        #[arg(long)]
        template: String,

        /// JSON object of template parameters
        #[arg(long, value_name = "FILE")]
        params: Option<PathBuf>,

        /// Wait for the rendering task to finish
        #[arg(long)]
        wait: bool,
    },

    /// Show a rendered application
    Get {
        tenant: String,
        application: String,

        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },

    /// Re-render an application with new parameters
    Update {
        tenant: String,
        application: String,

        #[arg(long, value_name = "FILE")]
        params: PathBuf,

        #[arg(long)]
        wait: bool,
    },

    /// Delete an application
    Delete {
        tenant: String,
        application: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Show the state of a FAST task
    Task {
        id: String,

        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

pub async fn handle_fast_command(command: FastCommands, bigip: &BigIp, poll: &PollConfig) -> Result<()> {
    match command {
        FastCommands::Create { template, params, wait } => {
            let parameters = match params {
                Some(path) => read_json_file::<Map<String, Value>>(&path)?,
                None => Map::new(),
            };
            let app = FastApplication { name: template, parameters };
            let task_id = bigip.create_fast_application(&app).await?;
            report_task(bigip, &task_id, wait, poll).await?;
        }
        FastCommands::Get { tenant, application, output } => {
            let app = bigip
                .get_fast_application(&tenant, &application)
                .await?
                .with_context(|| format!("Application '{}/{}' not found", tenant, application))?;
            output::print_output(&app, output)?;
        }
        FastCommands::Update { tenant, application, params, wait } => {
            let parameters = read_json_file::<Map<String, Value>>(&params)?;
            let task_id = bigip
                .update_fast_application(&tenant, &application, &FastParameters { parameters })
                .await?;
            report_task(bigip, &task_id, wait, poll).await?;
        }
        FastCommands::Delete { tenant, application, yes } => {
            if !output::confirm(&format!("Delete FAST application '{}/{}'?", tenant, application), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            bigip.delete_fast_application(&tenant, &application).await?;
            println!("Application '{}/{}' deleted", tenant, application);
        }
        FastCommands::Task { id, output } => {
            let task = bigip.fast_task(&id).await?.with_context(|| format!("Task '{}' not found", id))?;
            match output {
                OutputFormat::Table => print_task(&task),
                other => output::print_output(&task, other)?,
            }
        }
    }

    Ok(())
}

async fn report_task(bigip: &BigIp, task_id: &str, wait: bool, poll: &PollConfig) -> Result<()> {
    if !wait {
        println!("Task started: {}", task_id);
        return Ok(());
    }
    let task = bigip.wait_fast_task(task_id, poll).await?;
    print_task(&task);
    Ok(())
}

fn print_task(task: &FastTask) {
    output::print_table_header(&[("Task", 38), ("Code", 5), ("Tenant", 16), ("Application", 20), ("Message", 30)]);
    println!(
        "{:<38} {:<5} {:<16} {:<20} {}",
        task.id,
        task.code,
        task.tenant.as_deref().unwrap_or("-"),
        task.application.as_deref().unwrap_or("-"),
        output::truncate(&task.message, 30)
    );
    println!();
}
