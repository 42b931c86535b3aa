//! Network objects: VLANs, self IPs and static routes.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::reference::{self, Collection};
use crate::client::uri::{MGMT, NET, ROUTE, SELF, TM, VLAN};
use crate::client::BigIp;
use crate::errors::Result;

/// VLAN; interfaces arrive under `interfacesReference`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vlan {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_lasthop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmp_hash: Option<String>,
    #[serde(
        rename = "interfacesReference",
        with = "reference::items",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub interfaces: Vec<VlanInterface>,
}

/// Physical interface or trunk bound to a VLAN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VlanInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub untagged: Option<bool>,
}

/// Self IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfIp {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    /// CIDR form, e.g. `10.0.2.5/24`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_group: Option<String>,
    /// `all`, `none`, or a list of `proto:port` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_service: Option<serde_json::Value>,
}

/// Static route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(rename = "gw", default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackhole: Option<bool>,
}

impl BigIp {
    // === VLANs ===

    pub async fn vlans(&self) -> Result<Vec<Vlan>> {
        let vlans: Option<Collection<Vlan>> = self
            .get_for_entity_with_query(&[MGMT, TM, NET, VLAN], &[("expandSubcollections", "true")])
            .await?;
        Ok(vlans.unwrap_or_default().into_items())
    }

    pub async fn get_vlan(&self, name: &str) -> Result<Option<Vlan>> {
        self.get_for_entity_with_query(
            &[MGMT, TM, NET, VLAN, name],
            &[("expandSubcollections", "true")],
        )
        .await
    }

    pub async fn create_vlan(&self, vlan: &Vlan) -> Result<()> {
        info!(vlan = %vlan.name, tag = ?vlan.tag, "Creating VLAN");
        self.post(vlan, &[MGMT, TM, NET, VLAN]).await
    }

    pub async fn modify_vlan(&self, name: &str, vlan: &Vlan) -> Result<()> {
        self.patch(vlan, &[MGMT, TM, NET, VLAN, name]).await
    }

    pub async fn delete_vlan(&self, name: &str) -> Result<()> {
        info!(vlan = %name, "Deleting VLAN");
        self.delete(&[MGMT, TM, NET, VLAN, name]).await
    }

    // === Self IPs ===

    pub async fn self_ips(&self) -> Result<Vec<SelfIp>> {
        let selfs: Option<Collection<SelfIp>> =
            self.get_for_entity(&[MGMT, TM, NET, SELF]).await?;
        Ok(selfs.unwrap_or_default().into_items())
    }

    pub async fn get_self_ip(&self, name: &str) -> Result<Option<SelfIp>> {
        self.get_for_entity(&[MGMT, TM, NET, SELF, name]).await
    }

    pub async fn create_self_ip(&self, self_ip: &SelfIp) -> Result<()> {
        self.post(self_ip, &[MGMT, TM, NET, SELF]).await
    }

    pub async fn modify_self_ip(&self, name: &str, self_ip: &SelfIp) -> Result<()> {
        self.patch(self_ip, &[MGMT, TM, NET, SELF, name]).await
    }

    pub async fn delete_self_ip(&self, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, NET, SELF, name]).await
    }

    // === Routes ===

    pub async fn get_route(&self, name: &str) -> Result<Option<Route>> {
        self.get_for_entity(&[MGMT, TM, NET, ROUTE, name]).await
    }

    pub async fn create_route(&self, route: &Route) -> Result<()> {
        self.post(route, &[MGMT, TM, NET, ROUTE]).await
    }

    pub async fn modify_route(&self, name: &str, route: &Route) -> Result<()> {
        self.put(route, &[MGMT, TM, NET, ROUTE, name]).await
    }

    pub async fn delete_route(&self, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, NET, ROUTE, name]).await
    }
}
