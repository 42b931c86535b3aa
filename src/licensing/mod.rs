//! BIG-IQ regkey pool licensing
//!
//! Assigning a license creates a pool member on the license manager, which
//! then installs the license on the target device in the background.
//! [`BigIp::poll_license_member`] waits for that installation to settle.

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::uri::{
    CM, DEVICE, LICENSES, LICENSING, MEMBERS, MGMT, OFFERINGS, POOL, REGKEY,
};
use crate::client::BigIp;
use crate::config::PollConfig;
use crate::errors::{BigIpError, Result};
use crate::resources::Collection;

pub const STATUS_LICENSED: &str = "LICENSED";
pub const STATUS_INSTALLATION_FAILED: &str = "INSTALLATION_FAILED";

/// Regkey pool on the license manager
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegkeyPool {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_name: Option<String>,
}

/// Device to license from a regkey offering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseAssignment {
    pub device_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor: Option<String>,
}

/// Pool member representing one licensed (or licensing) device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseMember {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Installation progress derived from a member's `status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseState {
    Licensed,
    Failed,
    InProgress,
}

impl LicenseMember {
    pub fn state(&self) -> LicenseState {
        match self.status.as_str() {
            STATUS_LICENSED => LicenseState::Licensed,
            STATUS_INSTALLATION_FAILED => LicenseState::Failed,
            _ => LicenseState::InProgress,
        }
    }
}

const POOLS: [&str; 7] = [MGMT, CM, DEVICE, LICENSING, POOL, REGKEY, LICENSES];

impl BigIp {
    pub async fn list_regkey_pools(&self) -> Result<Vec<RegkeyPool>> {
        let pools: Option<Collection<RegkeyPool>> = self.get_for_entity(&POOLS).await?;
        Ok(pools.unwrap_or_default().into_items())
    }

    /// Look up a regkey pool id by its display name.
    pub async fn regkey_pool_id(&self, name: &str) -> Result<String> {
        self.list_regkey_pools()
            .await?
            .into_iter()
            .find(|pool| pool.name == name)
            .map(|pool| pool.id)
            .ok_or_else(|| BigIpError::domain(format!("could not find regkey pool '{}'", name)))
    }

    pub async fn assign_license(
        &self,
        pool_id: &str,
        regkey: &str,
        assignment: &LicenseAssignment,
    ) -> Result<LicenseMember> {
        info!(pool = %pool_id, regkey = %regkey, device = %assignment.device_address, "Assigning license");
        let body = self
            .post_req(
                assignment,
                &[MGMT, CM, DEVICE, LICENSING, POOL, REGKEY, LICENSES, pool_id, OFFERINGS, regkey, MEMBERS],
            )
            .await?;
        serde_json::from_slice(&body)
            .map_err(|e| BigIpError::serialization("Failed to decode license member", e))
    }

    pub async fn license_member(
        &self,
        pool_id: &str,
        regkey: &str,
        member_id: &str,
    ) -> Result<Option<LicenseMember>> {
        self.get_for_entity(&[
            MGMT, CM, DEVICE, LICENSING, POOL, REGKEY, LICENSES, pool_id, OFFERINGS, regkey, MEMBERS,
            member_id,
        ])
        .await
    }

    /// Read the member until it is `LICENSED`.
    ///
    /// `INSTALLATION_FAILED` ends the poll immediately with a license error.
    /// Any other status is retried with growing delays, at most
    /// `poll.max_attempts` reads in total.
    pub async fn poll_license_member(
        &self,
        pool_id: &str,
        regkey: &str,
        member_id: &str,
        poll: &PollConfig,
    ) -> Result<LicenseMember> {
        for attempt in 1..=poll.max_attempts {
            let member = self
                .license_member(pool_id, regkey, member_id)
                .await?
                .ok_or_else(|| {
                    BigIpError::domain(format!("license member '{}' not found", member_id))
                })?;

            match member.state() {
                LicenseState::Licensed => {
                    info!(member = %member_id, attempt, "License installed");
                    return Ok(member);
                }
                LicenseState::Failed => {
                    let message = member
                        .message
                        .clone()
                        .unwrap_or_else(|| STATUS_INSTALLATION_FAILED.to_string());
                    warn!(member = %member_id, message = %message, "License installation failed");
                    return Err(BigIpError::license(member_id, message));
                }
                LicenseState::InProgress => {
                    if attempt < poll.max_attempts {
                        let delay = poll.delay_after(attempt);
                        debug!(
                            member = %member_id,
                            status = %member.status,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "License not installed yet"
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(BigIpError::timeout(
            format!("license member {} installation", member_id),
            poll.max_attempts,
        ))
    }

    pub async fn revoke_license(&self, pool_id: &str, regkey: &str, member_id: &str) -> Result<()> {
        info!(pool = %pool_id, regkey = %regkey, member = %member_id, "Revoking license");
        self.delete(&[
            MGMT, CM, DEVICE, LICENSING, POOL, REGKEY, LICENSES, pool_id, OFFERINGS, regkey, MEMBERS,
            member_id,
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_state() {
        let member = |status: &str| LicenseMember { id: "m".into(), status: status.into(), ..Default::default() };
        assert_eq!(member("LICENSED").state(), LicenseState::Licensed);
        assert_eq!(member("INSTALLATION_FAILED").state(), LicenseState::Failed);
        assert_eq!(member("INSTALLING").state(), LicenseState::InProgress);
        assert_eq!(member("").state(), LicenseState::InProgress);
    }

    #[test]
    fn test_assignment_wire_format() {
        let assignment = LicenseAssignment {
            device_address: "10.1.1.4".into(),
            username: Some("admin".into()),
            password: Some("secret".into()),
            https_port: Some(443),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&assignment).unwrap(),
            json!({"deviceAddress": "10.1.1.4", "username": "admin", "password": "secret", "httpsPort": 443})
        );
    }
}
