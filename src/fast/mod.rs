//! F5 Application Services Templates (FAST) applications
//!
//! Creating or changing an application starts an asynchronous task on the
//! appliance; callers either inspect it with [`BigIp::fast_task`] or block on
//! [`BigIp::wait_fast_task`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::client::uri::{APPLICATIONS, FAST, MGMT, SHARED, TASKS};
use crate::client::BigIp;
use crate::config::PollConfig;
use crate::errors::{BigIpError, Result};

/// Request body for rendering a template into an application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FastApplication {
    /// Template path, e.g. `examples/simple_http`
    pub name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Request body for updating parameters of an existing application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FastParameters {
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// State of an asynchronous FAST task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FastTask {
    pub id: String,
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl FastTask {
    pub fn is_pending(&self) -> bool {
        self.code == 0 || self.message.eq_ignore_ascii_case("in progress")
    }

    pub fn is_success(&self) -> bool {
        !self.is_pending() && self.code < 400
    }
}

#[derive(Debug, Deserialize)]
struct TaskRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(default)]
    message: Vec<TaskRef>,
}

impl BigIp {
    /// Render `app.name` with its parameters; returns the task id.
    pub async fn create_fast_application(&self, app: &FastApplication) -> Result<String> {
        info!(template = %app.name, "Creating FAST application");
        let body = self.post_req(app, &[MGMT, SHARED, FAST, APPLICATIONS]).await?;
        task_id_from(&body)
    }

    pub async fn fast_task(&self, id: &str) -> Result<Option<FastTask>> {
        self.get_for_entity(&[MGMT, SHARED, FAST, TASKS, id]).await
    }

    /// Poll a task until it leaves the pending state.
    ///
    /// A finished task with an error code is a domain error; a task that is
    /// still pending after `poll.max_attempts` reads is a timeout.
    pub async fn wait_fast_task(&self, id: &str, poll: &PollConfig) -> Result<FastTask> {
        for attempt in 1..=poll.max_attempts {
            let task = self
                .fast_task(id)
                .await?
                .ok_or_else(|| BigIpError::domain(format!("FAST task '{}' not found", id)))?;

            if !task.is_pending() {
                if task.is_success() {
                    return Ok(task);
                }
                return Err(BigIpError::domain(format!(
                    "FAST task '{}' failed ({}): {}",
                    id, task.code, task.message
                )));
            }

            if attempt < poll.max_attempts {
                let delay = poll.delay_after(attempt);
                debug!(task = %id, attempt, delay_ms = delay.as_millis() as u64, "FAST task pending");
                sleep(delay).await;
            }
        }

        Err(BigIpError::timeout(format!("FAST task {}", id), poll.max_attempts))
    }

    /// Rendered application; the appliance expects a trailing separator here.
    pub async fn get_fast_application(&self, tenant: &str, app: &str) -> Result<Option<Value>> {
        self.get_for_entity(&[MGMT, SHARED, FAST, APPLICATIONS, tenant, app, ""]).await
    }

    /// Re-render with new parameters; returns the task id.
    pub async fn update_fast_application(
        &self,
        tenant: &str,
        app: &str,
        params: &FastParameters,
    ) -> Result<String> {
        info!(tenant = %tenant, application = %app, "Updating FAST application");
        let body = self
            .send_json(
                reqwest::Method::PATCH,
                params,
                &[MGMT, SHARED, FAST, APPLICATIONS, tenant, app],
                &[],
            )
            .await?;
        task_id_from(&body)
    }

    pub async fn delete_fast_application(&self, tenant: &str, app: &str) -> Result<()> {
        info!(tenant = %tenant, application = %app, "Deleting FAST application");
        self.delete(&[MGMT, SHARED, FAST, APPLICATIONS, tenant, app]).await
    }
}

fn task_id_from(body: &[u8]) -> Result<String> {
    let response: CreateResponse = serde_json::from_slice(body)
        .map_err(|e| BigIpError::serialization("Failed to decode FAST task reference", e))?;
    response
        .message
        .into_iter()
        .next()
        .map(|task| task.id)
        .ok_or_else(|| BigIpError::domain("FAST response did not include a task id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_id_from_response() {
        let body = json!({
            "code": 202,
            "message": [{"id": "8b9f9a9c-e4a2-4f1e-9d7b-5a0c5a7b2e61", "name": "examples/simple_http"}]
        });
        let id = task_id_from(body.to_string().as_bytes()).unwrap();
        assert_eq!(id, "8b9f9a9c-e4a2-4f1e-9d7b-5a0c5a7b2e61");
    }

    #[test]
    fn test_task_id_missing_is_domain_error() {
        let err = task_id_from(br#"{"code":202,"message":[]}"#).unwrap_err();
        assert!(matches!(err, BigIpError::Domain { .. }));
        assert!(task_id_from(b"not json").is_err());
    }

    #[test]
    fn test_task_states() {
        let pending = FastTask { id: "t".into(), code: 0, message: "in progress".into(), ..Default::default() };
        assert!(pending.is_pending());

        let done = FastTask { id: "t".into(), code: 200, message: "success".into(), ..Default::default() };
        assert!(done.is_success());

        let failed = FastTask { id: "t".into(), code: 422, message: "declaration failed".into(), ..Default::default() };
        assert!(!failed.is_pending());
        assert!(!failed.is_success());
    }
}
