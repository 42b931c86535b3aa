//! `bigip ilx` commands

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use super::output::{self, OutputFormat};
use crate::client::BigIp;
use crate::ilx::{ExtensionFile, ExtensionLocation, UPLOADABLE_FILES};

#[derive(clap::Args, Clone)]
pub struct LocationArgs {
    #[arg(long, default_value = "Common")]
    pub partition: String,

    #[arg(long)]
    pub workspace: String,

    #[arg(long)]
    pub extension: String,
}

impl From<LocationArgs> for ExtensionLocation {
    fn from(args: LocationArgs) -> Self {
        ExtensionLocation::new(args.partition, args.workspace, args.extension)
    }
}

#[derive(Subcommand)]
pub enum IlxCommands {
    /// Create an empty workspace
    CreateWorkspace { name: String },

    /// Show a workspace with its extensions and rules
    GetWorkspace {
        name: String,

        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,
    },

    /// Delete a workspace
    DeleteWorkspace {
        name: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Add an extension to a workspace
    CreateExtension { workspace: String, extension: String },

    /// Copy extension files from the appliance into a local directory
    #[command(after_help = "EXAMPLES:\n    bigip ilx pull --workspace ws1 --extension ext1 --dir ./ext1")]
    Pull {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
    },

    /// Upload index.js and package.json from a local directory
    #[command(after_help = "EXAMPLES:\n    bigip ilx push --workspace ws1 --extension ext1 --dir ./ext1")]
    Push {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
    },
}

pub async fn handle_ilx_command(command: IlxCommands, bigip: &BigIp) -> Result<()> {
    match command {
        IlxCommands::CreateWorkspace { name } => {
            bigip.create_ilx_workspace(&name).await?;
            println!("Workspace '{}' created", name);
        }
        IlxCommands::GetWorkspace { name, output } => {
            let workspace = bigip
                .ilx_workspace(&name)
                .await?
                .with_context(|| format!("Workspace '{}' not found", name))?;
            output::print_output(&workspace, output)?;
        }
        IlxCommands::DeleteWorkspace { name, yes } => {
            if !output::confirm(&format!("Delete ILX workspace '{}'?", name), yes)? {
                println!("Cancelled");
                return Ok(());
            }
            bigip.delete_ilx_workspace(&name).await?;
            println!("Workspace '{}' deleted", name);
        }
        IlxCommands::CreateExtension { workspace, extension } => {
            bigip.create_ilx_extension(&workspace, &extension).await?;
            println!("Extension '{}' added to workspace '{}'", extension, workspace);
        }
        IlxCommands::Pull { location, dir } => {
            let loc = ExtensionLocation::from(location);
            let files = bigip.list_extension_files(&loc).await?;
            write_local_files(&dir, &files)?;
            println!("Pulled {} file(s) into {}", files.len(), dir.display());
        }
        IlxCommands::Push { location, dir } => {
            let loc = ExtensionLocation::from(location);
            let files = read_local_files(&dir)?;
            if files.is_empty() {
                anyhow::bail!("No {} found in {}", UPLOADABLE_FILES.join(" or "), dir.display());
            }
            bigip.sync_extension_files(&loc, &files).await?;
            println!("Pushed {} file(s) to {}", files.len(), loc.dir());
        }
    }

    Ok(())
}

fn write_local_files(dir: &Path, files: &[ExtensionFile]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    for file in files {
        let path = dir.join(&file.name);
        std::fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Uploadable files present in `dir`, in upload order
fn read_local_files(dir: &Path) -> Result<Vec<ExtensionFile>> {
    let mut files = Vec::new();
    for name in UPLOADABLE_FILES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(ExtensionFile { name: name.to_string(), content });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_files_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![
            ExtensionFile { name: "index.js".into(), content: "module.exports = {};\n".into() },
            ExtensionFile { name: "package.json".into(), content: "{\"name\":\"ext1\"}".into() },
        ];

        write_local_files(temp_dir.path(), &files).unwrap();
        assert_eq!(read_local_files(temp_dir.path()).unwrap(), files);
    }

    #[test]
    fn test_read_local_files_skips_other_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("index.js"), "x").unwrap();
        std::fs::write(temp_dir.path().join("helper.js"), "y").unwrap();

        let files = read_local_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "index.js");
    }
}
