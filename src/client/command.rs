//! Shell command execution and file transfer
//!
//! Used by flows that have no dedicated REST resource (reading and placing
//! iRules LX files on disk).

use reqwest::{header::CONTENT_TYPE, Method};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::uri::{join_path, BASH, FILE_TRANSFER, MGMT, SHARED, TM, UPLOADS, UPLOAD_DIR, UTIL};
use super::rest::check_status;
use super::BigIp;
use crate::errors::{BigIpError, Result};

/// Upload chunk size accepted by the file-transfer endpoint
const UPLOAD_CHUNK_SIZE: usize = 512 * 1024;

/// Body of `/mgmt/tm/util/bash`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BashCommand {
    pub command: String,
    pub util_cmd_args: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_result: Option<String>,
}

impl BashCommand {
    /// Wrap a shell script as `bash -c '<script>'`
    pub fn run(script: &str) -> Self {
        Self {
            command: "run".to_string(),
            util_cmd_args: format!("-c '{}'", script.replace('\'', r"'\''")),
            command_result: None,
        }
    }
}

impl BigIp {
    /// Run a shell script on the appliance and return its stdout.
    pub async fn run_bash(&self, script: &str) -> Result<String> {
        debug!(script = %script, "Running bash command");
        let body = self.post_req(&BashCommand::run(script), &[MGMT, TM, UTIL, BASH]).await?;
        let result: BashCommand = serde_json::from_slice(&body)
            .map_err(|e| BigIpError::serialization("Failed to decode bash command result", e))?;
        Ok(result.command_result.unwrap_or_default())
    }

    /// Upload `content` through the file-transfer endpoint.
    ///
    /// Returns the on-box path the file landed at.
    pub async fn upload_file(&self, name: &str, content: &[u8]) -> Result<String> {
        let joined = join_path(&[MGMT, SHARED, FILE_TRANSFER, UPLOADS, name]);
        let total = content.len();

        let chunks: Vec<&[u8]> = if content.is_empty() {
            vec![content]
        } else {
            content.chunks(UPLOAD_CHUNK_SIZE).collect()
        };

        let mut start = 0usize;
        for chunk in chunks {
            let end = (start + chunk.len()).saturating_sub(1);
            let req = self
                .request(Method::POST, &joined)
                .header(CONTENT_TYPE, "application/octet-stream")
                .header("Content-Range", format!("{}-{}/{}", start, end, total))
                .body(chunk.to_vec());

            let (status, body) = self.execute(Method::POST, &joined, req).await?;
            check_status(&Method::POST, &joined, status, &body)?;
            start += chunk.len();
        }

        Ok(format!("{}/{}", UPLOAD_DIR, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_command_wraps_script() {
        let cmd = BashCommand::run("ls -1 /var/ilx");
        assert_eq!(cmd.command, "run");
        assert_eq!(cmd.util_cmd_args, "-c 'ls -1 /var/ilx'");

        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["utilCmdArgs"], "-c 'ls -1 /var/ilx'");
        assert!(json.get("commandResult").is_none());
    }

    #[test]
    fn test_bash_command_escapes_single_quotes() {
        let cmd = BashCommand::run("echo 'hi'");
        assert_eq!(cmd.util_cmd_args, r"-c 'echo '\''hi'\'''");
    }

    #[test]
    fn test_bash_result_deserialization() {
        let json = r#"{"kind":"tm:util:bash:runstate","command":"run","utilCmdArgs":"-c 'ls'","commandResult":"index.js\n"}"#;
        let cmd: BashCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.command_result.as_deref(), Some("index.js\n"));
    }
}
