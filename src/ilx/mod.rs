//! iRules LX workspaces and extension files
//!
//! Workspaces are managed over REST; extension sources live on disk under
//! `/var/ilx/workspaces` and are read and written through bash and the
//! file-transfer endpoint.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::uri::{ILX, MGMT, TM, WORKSPACE};
use crate::client::BigIp;
use crate::errors::{BigIpError, Result};

/// Root of the on-box workspace tree
pub const WORKSPACE_ROOT: &str = "/var/ilx/workspaces";

/// Directory entries never returned by [`BigIp::list_extension_files`]
pub const IGNORED_ENTRIES: &[&str] = &["node_modules"];

/// Printed instead of a listing when the extension directory does not exist
const MISSING_DIR_MARKER: &str = "__bigip_missing_dir__";

/// Files [`BigIp::upload_extension_file`] may write
pub const UPLOADABLE_FILES: &[&str] = &["index.js", "package.json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IlxWorkspace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<IlxExtension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<IlxFileRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IlxExtension {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<IlxFileRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IlxFileRef {
    pub name: String,
}

/// One extension source file and its contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionFile {
    pub name: String,
    pub content: String,
}

/// Where an extension's files live on the appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionLocation {
    pub partition: String,
    pub workspace: String,
    pub extension: String,
}

impl ExtensionLocation {
    pub fn new(
        partition: impl Into<String>,
        workspace: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self { partition: partition.into(), workspace: workspace.into(), extension: extension.into() }
    }

    /// Check every component is safe to interpolate into a shell command.
    pub fn validate(&self) -> Result<()> {
        validate_name("partition", &self.partition)?;
        validate_name("workspace", &self.workspace)?;
        validate_name("extension", &self.extension)
    }

    pub fn dir(&self) -> String {
        format!(
            "{}/{}/{}/extensions/{}",
            WORKSPACE_ROOT, self.partition, self.workspace, self.extension
        )
    }
}

fn is_safe_name(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if is_safe_name(value) {
        Ok(())
    } else {
        Err(BigIpError::validation_field(
            format!("Invalid {} name '{}': only letters, digits, '.', '_' and '-' are allowed", field, value),
            field,
        ))
    }
}

/// `ls -1p` output for `dir`, or the missing-directory marker
fn listing_command(dir: &str) -> String {
    format!("if [ -d {dir} ]; then ls -1p {dir}; else echo {MISSING_DIR_MARKER}; fi")
}

/// Regular files of an `ls -1p` listing; directories end in `/` and are dropped
fn listed_files(listing: &str) -> Vec<&str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|entry| !entry.is_empty() && !entry.ends_with('/') && !IGNORED_ENTRIES.contains(entry))
        .collect()
}

#[derive(Serialize)]
struct WorkspaceName<'a> {
    name: &'a str,
}

impl BigIp {
    // === Workspaces ===

    pub async fn create_ilx_workspace(&self, name: &str) -> Result<()> {
        info!(workspace = %name, "Creating ILX workspace");
        self.post(&WorkspaceName { name }, &[MGMT, TM, ILX, WORKSPACE]).await
    }

    pub async fn ilx_workspace(&self, name: &str) -> Result<Option<IlxWorkspace>> {
        self.get_for_entity(&[MGMT, TM, ILX, WORKSPACE, name]).await
    }

    pub async fn delete_ilx_workspace(&self, name: &str) -> Result<()> {
        info!(workspace = %name, "Deleting ILX workspace");
        self.delete(&[MGMT, TM, ILX, WORKSPACE, name]).await
    }

    /// Add an extension skeleton (`index.js`, `package.json`) to a workspace.
    pub async fn create_ilx_extension(&self, workspace: &str, extension: &str) -> Result<()> {
        info!(workspace = %workspace, extension = %extension, "Creating ILX extension");
        let options = format!("extension,{}", extension);
        self.send_json(
            reqwest::Method::PUT,
            &WorkspaceName { name: workspace },
            &[MGMT, TM, ILX, WORKSPACE, workspace],
            &[("options", options.as_str())],
        )
        .await
        .map(|_| ())
    }

    // === Extension files ===

    /// Read back every regular file of an extension directory except ignored
    /// entries. A missing directory is a domain error.
    pub async fn list_extension_files(&self, loc: &ExtensionLocation) -> Result<Vec<ExtensionFile>> {
        loc.validate()?;
        let dir = loc.dir();
        let listing = self.run_bash(&listing_command(&dir)).await?;
        if listing.trim() == MISSING_DIR_MARKER {
            return Err(BigIpError::domain(format!("Extension directory {} does not exist", dir)));
        }

        let mut files = Vec::new();
        for name in listed_files(&listing) {
            if !is_safe_name(name) {
                warn!(file = %name, dir = %dir, "Skipping extension file with unsupported name");
                continue;
            }
            let content = self.run_bash(&format!("cat {}/{}", dir, name)).await?;
            files.push(ExtensionFile { name: name.to_string(), content });
        }

        debug!(dir = %dir, count = files.len(), "Listed extension files");
        Ok(files)
    }

    /// Place `content` at `<extension dir>/<name>`.
    pub async fn upload_extension_file(
        &self,
        loc: &ExtensionLocation,
        name: &str,
        content: &str,
    ) -> Result<()> {
        if !UPLOADABLE_FILES.contains(&name) {
            return Err(BigIpError::validation_field(
                format!("Cannot upload '{}': only {} are supported", name, UPLOADABLE_FILES.join(" and ")),
                "name",
            ));
        }
        loc.validate()?;

        let staged_name = format!("{}_{}_{}", loc.workspace, loc.extension, name);
        let staged_path = self.upload_file(&staged_name, content.as_bytes()).await?;
        self.run_bash(&format!("mv {} {}/{}", staged_path, loc.dir(), name)).await?;

        info!(file = %name, dir = %loc.dir(), "Uploaded extension file");
        Ok(())
    }

    /// Upload `files` in order; stops at the first failure.
    ///
    /// Files written before the failure stay on the appliance.
    pub async fn sync_extension_files(&self, loc: &ExtensionLocation, files: &[ExtensionFile]) -> Result<()> {
        for file in files {
            self.upload_extension_file(loc, &file.name, &file.content).await?;
        }
        Ok(())
    }
}
