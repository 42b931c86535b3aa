//! AS3 declarative deployments
//!
//! Declarations go to `/mgmt/shared/appsvcs/declare` in one POST; tenants are
//! read and removed by name under the same path.

pub mod declaration;

pub use declaration::{
    Adc, Application, As3Action, As3Item, As3Monitor, As3Pointer, As3Pool, As3PoolMember,
    As3Request, As3Service, Tenant, DEFAULT_SCHEMA_VERSION,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::uri::{APPSVCS, DECLARE, MGMT, SHARED};
use crate::client::BigIp;
use crate::errors::{BigIpError, Result};

/// Tenant scope and request options for one AS3 operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct As3Context {
    pub tenant: String,
    pub action: Option<As3Action>,
    pub persist: Option<bool>,
}

impl As3Context {
    pub fn new(tenant: impl Into<String>) -> Self {
        Self { tenant: tenant.into(), action: None, persist: None }
    }

    pub fn with_action(mut self, action: As3Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = Some(persist);
        self
    }

    /// Copy of `request` with this context's overrides applied.
    ///
    /// Fails when the declaration does not define the context's tenant.
    pub fn prepare(&self, request: &As3Request) -> Result<As3Request> {
        if !request.declaration.tenants.contains_key(&self.tenant) {
            return Err(BigIpError::validation_field(
                format!("Declaration does not contain tenant '{}'", self.tenant),
                "tenant",
            ));
        }

        let mut prepared = request.clone();
        if self.action.is_some() {
            prepared.action = self.action;
        }
        if self.persist.is_some() {
            prepared.persist = self.persist;
        }
        Ok(prepared)
    }
}

/// Per-tenant outcome reported by the AS3 service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct As3Result {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_time: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct As3Response {
    #[serde(default)]
    results: Vec<As3Result>,
}

impl BigIp {
    /// POST `request` scoped to `ctx.tenant`.
    ///
    /// A tenant result with a 4xx/5xx code is reported as a domain error even
    /// though the HTTP exchange itself succeeded.
    pub async fn deploy_as3(&self, ctx: &As3Context, request: &As3Request) -> Result<Vec<As3Result>> {
        let prepared = ctx.prepare(request)?;
        info!(tenant = %ctx.tenant, action = ?prepared.action, "Deploying AS3 declaration");

        let body = self.post_req(&prepared, &[MGMT, SHARED, APPSVCS, DECLARE]).await?;
        let response: As3Response = if body.is_empty() {
            As3Response::default()
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| BigIpError::serialization("Failed to decode AS3 response", e))?
        };

        if let Some(failed) = response.results.iter().find(|r| r.code >= 400) {
            warn!(tenant = ?failed.tenant, code = failed.code, "AS3 tenant deployment failed");
            return Err(BigIpError::domain(format!(
                "AS3 declaration for tenant '{}' failed: {}",
                failed.tenant.as_deref().unwrap_or(&ctx.tenant),
                failed.message
            )));
        }

        Ok(response.results)
    }

    /// Current declaration of one tenant, `None` when AS3 does not know it.
    pub async fn get_as3_tenant(&self, tenant: &str) -> Result<Option<Value>> {
        self.get_for_entity(&[MGMT, SHARED, APPSVCS, DECLARE, tenant]).await
    }

    pub async fn delete_as3_tenant(&self, tenant: &str) -> Result<()> {
        info!(tenant = %tenant, "Deleting AS3 tenant");
        self.delete(&[MGMT, SHARED, APPSVCS, DECLARE, tenant]).await
    }
}
