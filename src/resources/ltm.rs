//! Local Traffic Manager objects: pools, pool members, nodes, virtual
//! servers, monitors and iRules.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::reference::{self, Collection};
use crate::client::uri::{LTM, MEMBERS, MGMT, MONITOR, NODE, POOL, RULE, TM, VIRTUAL};
use crate::client::BigIp;
use crate::errors::Result;

const EXPAND: [(&str, &str); 1] = [("expandSubcollections", "true")];

/// LTM pool; members arrive under `membersReference`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_nat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_snat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_ramp_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_active_members: Option<u32>,
    #[serde(
        rename = "membersReference",
        with = "reference::items",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub members: Vec<PoolMember>,
}

/// Member of an LTM pool (`<node>:<port>`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMember {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_ratio: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_group: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<String>,
    /// `user-enabled` / `user-disabled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// `user-up` / `user-down`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// LTM node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Source address translation settings of a virtual server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceAddressTranslation {
    /// `automap`, `snat` or `none`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
}

/// Profile attached to a virtual server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualServerProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    /// `all`, `clientside` or `serverside`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Local traffic policy attached to a virtual server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualServerPolicy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
}

/// LTM virtual server; profiles and policies arrive as references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualServer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `<address>:<port>`, e.g. `/Common/10.0.2.10:80`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_translation: Option<SourceAddressTranslation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlans: Vec<String>,
    #[serde(
        rename = "profilesReference",
        with = "reference::items",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub profiles: Vec<VirtualServerProfile>,
    #[serde(
        rename = "policiesReference",
        with = "reference::items",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub policies: Vec<VirtualServerPolicy>,
}

/// Health monitor (`/mgmt/tm/ltm/monitor/<kind>`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// iRule source text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(rename = "apiAnonymous", default)]
    pub definition: String,
}

impl BigIp {
    // === Pools ===

    /// List pools with their members expanded
    pub async fn pools(&self) -> Result<Vec<Pool>> {
        let pools: Option<Collection<Pool>> =
            self.get_for_entity_with_query(&[MGMT, TM, LTM, POOL], &EXPAND).await?;
        Ok(pools.unwrap_or_default().into_items())
    }

    /// Get a pool by name or full path, members expanded
    pub async fn get_pool(&self, name: &str) -> Result<Option<Pool>> {
        self.get_for_entity_with_query(&[MGMT, TM, LTM, POOL, name], &EXPAND).await
    }

    pub async fn create_pool(&self, pool: &Pool) -> Result<()> {
        info!(pool = %pool.name, "Creating pool");
        self.post(pool, &[MGMT, TM, LTM, POOL]).await
    }

    pub async fn modify_pool(&self, name: &str, pool: &Pool) -> Result<()> {
        self.put(pool, &[MGMT, TM, LTM, POOL, name]).await
    }

    pub async fn delete_pool(&self, name: &str) -> Result<()> {
        info!(pool = %name, "Deleting pool");
        self.delete(&[MGMT, TM, LTM, POOL, name]).await
    }

    // === Pool members ===

    pub async fn pool_members(&self, pool: &str) -> Result<Vec<PoolMember>> {
        let members: Option<Collection<PoolMember>> =
            self.get_for_entity(&[MGMT, TM, LTM, POOL, pool, MEMBERS]).await?;
        Ok(members.unwrap_or_default().into_items())
    }

    pub async fn add_pool_member(&self, pool: &str, member: &PoolMember) -> Result<()> {
        info!(pool = %pool, member = %member.name, "Adding pool member");
        self.post(member, &[MGMT, TM, LTM, POOL, pool, MEMBERS]).await
    }

    /// Partially update a member (e.g. `state`/`session` to force offline)
    pub async fn modify_pool_member(&self, pool: &str, member: &PoolMember) -> Result<()> {
        let name = member.full_path.as_deref().unwrap_or(&member.name);
        self.patch(member, &[MGMT, TM, LTM, POOL, pool, MEMBERS, name]).await
    }

    pub async fn delete_pool_member(&self, pool: &str, member: &str) -> Result<()> {
        info!(pool = %pool, member = %member, "Removing pool member");
        self.delete(&[MGMT, TM, LTM, POOL, pool, MEMBERS, member]).await
    }

    // === Nodes ===

    pub async fn nodes(&self) -> Result<Vec<Node>> {
        let nodes: Option<Collection<Node>> = self.get_for_entity(&[MGMT, TM, LTM, NODE]).await?;
        Ok(nodes.unwrap_or_default().into_items())
    }

    pub async fn get_node(&self, name: &str) -> Result<Option<Node>> {
        self.get_for_entity(&[MGMT, TM, LTM, NODE, name]).await
    }

    pub async fn create_node(&self, node: &Node) -> Result<()> {
        self.post(node, &[MGMT, TM, LTM, NODE]).await
    }

    pub async fn modify_node(&self, name: &str, node: &Node) -> Result<()> {
        self.patch(node, &[MGMT, TM, LTM, NODE, name]).await
    }

    pub async fn delete_node(&self, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, LTM, NODE, name]).await
    }

    // === Virtual servers ===

    pub async fn virtual_servers(&self) -> Result<Vec<VirtualServer>> {
        let virtuals: Option<Collection<VirtualServer>> =
            self.get_for_entity_with_query(&[MGMT, TM, LTM, VIRTUAL], &EXPAND).await?;
        Ok(virtuals.unwrap_or_default().into_items())
    }

    pub async fn get_virtual_server(&self, name: &str) -> Result<Option<VirtualServer>> {
        self.get_for_entity_with_query(&[MGMT, TM, LTM, VIRTUAL, name], &EXPAND).await
    }

    pub async fn create_virtual_server(&self, vs: &VirtualServer) -> Result<()> {
        info!(virtual_server = %vs.name, "Creating virtual server");
        self.post(vs, &[MGMT, TM, LTM, VIRTUAL]).await
    }

    pub async fn modify_virtual_server(&self, name: &str, vs: &VirtualServer) -> Result<()> {
        self.put(vs, &[MGMT, TM, LTM, VIRTUAL, name]).await
    }

    pub async fn delete_virtual_server(&self, name: &str) -> Result<()> {
        info!(virtual_server = %name, "Deleting virtual server");
        self.delete(&[MGMT, TM, LTM, VIRTUAL, name]).await
    }

    // === Monitors ===

    /// Get a monitor of the given kind (`http`, `https`, `tcp`, ...)
    pub async fn get_monitor(&self, kind: &str, name: &str) -> Result<Option<Monitor>> {
        self.get_for_entity(&[MGMT, TM, LTM, MONITOR, kind, name]).await
    }

    pub async fn create_monitor(&self, kind: &str, monitor: &Monitor) -> Result<()> {
        self.post(monitor, &[MGMT, TM, LTM, MONITOR, kind]).await
    }

    pub async fn modify_monitor(&self, kind: &str, name: &str, monitor: &Monitor) -> Result<()> {
        self.patch(monitor, &[MGMT, TM, LTM, MONITOR, kind, name]).await
    }

    pub async fn delete_monitor(&self, kind: &str, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, LTM, MONITOR, kind, name]).await
    }

    // === iRules ===

    pub async fn get_irule(&self, name: &str) -> Result<Option<IRule>> {
        self.get_for_entity(&[MGMT, TM, LTM, RULE, name]).await
    }

    pub async fn create_irule(&self, rule: &IRule) -> Result<()> {
        self.post(rule, &[MGMT, TM, LTM, RULE]).await
    }

    pub async fn modify_irule(&self, name: &str, rule: &IRule) -> Result<()> {
        self.put(rule, &[MGMT, TM, LTM, RULE, name]).await
    }

    pub async fn delete_irule(&self, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, LTM, RULE, name]).await
    }
}
