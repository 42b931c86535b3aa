//! Global Traffic Manager objects: datacenters, servers and wide IPs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use super::reference::{self, Collection};
use crate::client::uri::{DATACENTER, GTM, MGMT, SERVER, TM, WIDEIP};
use crate::client::BigIp;
use crate::errors::{BigIpError, Result};

/// GTM datacenter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datacenter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prober_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prober_fallback: Option<String>,
}

/// Address of a GTM server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerAddress {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

/// Virtual server known to a GTM server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmVirtualServer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_port: Option<u16>,
}

/// GTM server; virtual servers arrive under `virtualServersReference`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtmServer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_server_discovery: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<ServerAddress>,
    #[serde(
        rename = "virtualServersReference",
        with = "reference::items",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub virtual_servers: Vec<GtmVirtualServer>,
}

/// DNS record type a wide IP answers for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Naptr,
    Srv,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "a",
            RecordType::Aaaa => "aaaa",
            RecordType::Cname => "cname",
            RecordType::Mx => "mx",
            RecordType::Naptr => "naptr",
            RecordType::Srv => "srv",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = BigIpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "a" => Ok(RecordType::A),
            "aaaa" => Ok(RecordType::Aaaa),
            "cname" => Ok(RecordType::Cname),
            "mx" => Ok(RecordType::Mx),
            "naptr" => Ok(RecordType::Naptr),
            "srv" => Ok(RecordType::Srv),
            other => Err(BigIpError::validation_field(
                format!("Unsupported GTM record type '{}'", other),
                "record_type",
            )),
        }
    }
}

/// Pool reference inside a wide IP
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WideIpPool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<u32>,
}

/// GTM wide IP (DNS name load balanced across GTM pools)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WideIp {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_lb_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pools: Vec<WideIpPool>,
}

impl BigIp {
    // === Datacenters ===

    pub async fn datacenters(&self) -> Result<Vec<Datacenter>> {
        let dcs: Option<Collection<Datacenter>> =
            self.get_for_entity(&[MGMT, TM, GTM, DATACENTER]).await?;
        Ok(dcs.unwrap_or_default().into_items())
    }

    pub async fn get_datacenter(&self, name: &str) -> Result<Option<Datacenter>> {
        self.get_for_entity(&[MGMT, TM, GTM, DATACENTER, name]).await
    }

    pub async fn create_datacenter(&self, dc: &Datacenter) -> Result<()> {
        info!(datacenter = %dc.name, "Creating GTM datacenter");
        self.post(dc, &[MGMT, TM, GTM, DATACENTER]).await
    }

    pub async fn modify_datacenter(&self, name: &str, dc: &Datacenter) -> Result<()> {
        self.put(dc, &[MGMT, TM, GTM, DATACENTER, name]).await
    }

    pub async fn delete_datacenter(&self, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, GTM, DATACENTER, name]).await
    }

    // === Servers ===

    pub async fn get_gtm_server(&self, name: &str) -> Result<Option<GtmServer>> {
        self.get_for_entity_with_query(
            &[MGMT, TM, GTM, SERVER, name],
            &[("expandSubcollections", "true")],
        )
        .await
    }

    pub async fn create_gtm_server(&self, server: &GtmServer) -> Result<()> {
        info!(server = %server.name, "Creating GTM server");
        self.post(server, &[MGMT, TM, GTM, SERVER]).await
    }

    pub async fn modify_gtm_server(&self, name: &str, server: &GtmServer) -> Result<()> {
        self.put(server, &[MGMT, TM, GTM, SERVER, name]).await
    }

    pub async fn delete_gtm_server(&self, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, GTM, SERVER, name]).await
    }

    // === Wide IPs ===

    pub async fn wide_ips(&self, record_type: RecordType) -> Result<Vec<WideIp>> {
        let wips: Option<Collection<WideIp>> =
            self.get_for_entity(&[MGMT, TM, GTM, WIDEIP, record_type.as_str()]).await?;
        Ok(wips.unwrap_or_default().into_items())
    }

    pub async fn get_wide_ip(&self, record_type: RecordType, name: &str) -> Result<Option<WideIp>> {
        self.get_for_entity(&[MGMT, TM, GTM, WIDEIP, record_type.as_str(), name]).await
    }

    pub async fn create_wide_ip(&self, record_type: RecordType, wip: &WideIp) -> Result<()> {
        info!(wide_ip = %wip.name, record_type = %record_type, "Creating wide IP");
        self.post(wip, &[MGMT, TM, GTM, WIDEIP, record_type.as_str()]).await
    }

    pub async fn modify_wide_ip(&self, record_type: RecordType, name: &str, wip: &WideIp) -> Result<()> {
        self.put(wip, &[MGMT, TM, GTM, WIDEIP, record_type.as_str(), name]).await
    }

    pub async fn delete_wide_ip(&self, record_type: RecordType, name: &str) -> Result<()> {
        self.delete(&[MGMT, TM, GTM, WIDEIP, record_type.as_str(), name]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_type_parsing() {
        assert_eq!("A".parse::<RecordType>().unwrap(), RecordType::A);
        assert_eq!("aaaa".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert!("txt".parse::<RecordType>().is_err());
        assert_eq!(RecordType::Cname.to_string(), "cname");
    }

    #[test]
    fn test_gtm_server_virtual_servers_unwrapped() {
        let wire = json!({
            "name": "bigip1",
            "datacenter": "/Common/dc1",
            "product": "bigip",
            "addresses": [{"name": "10.1.1.4", "deviceName": "bigip1.lab", "translation": "none"}],
            "virtualServersReference": {
                "isSubcollection": true,
                "items": [{"name": "vs_http", "destination": "10.0.2.10:80"}]
            }
        });
        let server: GtmServer = serde_json::from_value(wire).unwrap();
        assert_eq!(server.addresses[0].device_name.as_deref(), Some("bigip1.lab"));
        assert_eq!(server.virtual_servers[0].destination.as_deref(), Some("10.0.2.10:80"));
    }

    #[test]
    fn test_wide_ip_serialization() {
        let wip = WideIp {
            name: "www.example.com".into(),
            pool_lb_mode: Some("round-robin".into()),
            pools: vec![WideIpPool { name: "gtm_pool".into(), order: Some(0), ..Default::default() }],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&wip).unwrap(),
            json!({
                "name": "www.example.com",
                "poolLbMode": "round-robin",
                "pools": [{"name": "gtm_pool", "order": 0}]
            })
        );
    }
}
