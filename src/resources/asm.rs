//! Application Security Manager policy lookup.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::reference::Collection;
use crate::client::uri::{ASM, MGMT, POLICIES, TM};
use crate::client::BigIp;
use crate::errors::{BigIpError, Result};

/// ASM (WAF) policy summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsmPolicy {
    /// Opaque policy id used in `/mgmt/tm/asm/policies/<id>`
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `$filter` expression matching a policy by full path
fn full_path_filter(full_path: &str) -> String {
    format!("fullPath eq {}", full_path)
}

impl BigIp {
    pub async fn asm_policies(&self) -> Result<Vec<AsmPolicy>> {
        let policies: Option<Collection<AsmPolicy>> =
            self.get_for_entity(&[MGMT, TM, ASM, POLICIES]).await?;
        Ok(policies.unwrap_or_default().into_items())
    }

    /// Resolve a policy's opaque id from its full path (`/Common/policy1`).
    pub async fn asm_policy_id(&self, full_path: &str) -> Result<String> {
        let filter = full_path_filter(full_path);
        let policies: Option<Collection<AsmPolicy>> = self
            .get_for_entity_with_query(&[MGMT, TM, ASM, POLICIES], &[("$filter", filter.as_str())])
            .await?;

        let policy = policies
            .unwrap_or_default()
            .into_items()
            .into_iter()
            .find(|p| !p.id.is_empty())
            .ok_or_else(|| BigIpError::domain("could not get the policy ID"))?;

        debug!(policy = %full_path, id = %policy.id, "Resolved ASM policy id");
        Ok(policy.id)
    }

    pub async fn get_asm_policy(&self, id: &str) -> Result<Option<AsmPolicy>> {
        self.get_for_entity(&[MGMT, TM, ASM, POLICIES, id]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_expression() {
        assert_eq!(full_path_filter("/Common/policy1"), "fullPath eq /Common/policy1");
    }

    #[test]
    fn test_policy_deserialization() {
        let wire = json!({
            "kind": "tm:asm:policies:policystate",
            "id": "W_a9Ycn3kQZUbFQ7R2Klbg",
            "name": "policy1",
            "fullPath": "/Common/policy1",
            "enforcementMode": "blocking",
            "active": true
        });
        let policy: AsmPolicy = serde_json::from_value(wire).unwrap();
        assert_eq!(policy.id, "W_a9Ycn3kQZUbFQ7R2Klbg");
        assert_eq!(policy.enforcement_mode.as_deref(), Some("blocking"));
    }
}
