//! Typed AS3 document tree.
//!
//! Every level carries its literal `class` and known properties as fields.
//! Properties and child objects not modelled here land in `extra` maps, so a
//! declaration read from disk survives a decode/encode cycle.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::Index;

pub const AS3_CLASS: &str = "AS3";
pub const ADC_CLASS: &str = "ADC";
pub const TENANT_CLASS: &str = "Tenant";
pub const APPLICATION_CLASS: &str = "Application";

/// Schema version stamped on declarations built here
pub const DEFAULT_SCHEMA_VERSION: &str = "3.15.0";

fn as3_class() -> String {
    AS3_CLASS.to_string()
}

fn adc_class() -> String {
    ADC_CLASS.to_string()
}

fn tenant_class() -> String {
    TENANT_CLASS.to_string()
}

fn application_class() -> String {
    APPLICATION_CLASS.to_string()
}

/// What the AS3 service should do with the declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum As3Action {
    Deploy,
    DryRun,
    Patch,
    Redeploy,
    Retrieve,
    Remove,
}

/// Top-level `{"class": "AS3", ...}` request wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct As3Request {
    #[serde(default = "as3_class")]
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<As3Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist: Option<bool>,
    pub declaration: Adc,
    /// `$schema`, `redeployAge`, `logLevel` and friends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{"class": "ADC", ...}` declaration; tenants sit beside the fixed keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adc {
    #[serde(default = "adc_class")]
    pub class: String,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<Value>,
    #[serde(flatten)]
    pub tenants: ClassMembers<Tenant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(default = "tenant_class")]
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_route_domain: Option<u32>,
    #[serde(flatten)]
    pub applications: ClassMembers<Application>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default = "application_class")]
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub items: ClassMembers<As3Item>,
}

/// One named object inside an application, discriminated by `class`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum As3Item {
    Pool(As3Pool),
    #[serde(rename = "Service_HTTP")]
    ServiceHttp(As3Service),
    #[serde(rename = "Service_HTTPS")]
    ServiceHttps(As3Service),
    #[serde(rename = "Service_TCP")]
    ServiceTcp(As3Service),
    Monitor(As3Monitor),
}

/// Node types that can appear as named children, selected by their `class`
pub trait As3Class {
    fn accepts(class: &str) -> bool;
}

impl As3Class for Tenant {
    fn accepts(class: &str) -> bool {
        class == TENANT_CLASS
    }
}

impl As3Class for Application {
    fn accepts(class: &str) -> bool {
        class == APPLICATION_CLASS
    }
}

impl As3Class for As3Item {
    fn accepts(class: &str) -> bool {
        matches!(class, "Pool" | "Service_HTTP" | "Service_HTTPS" | "Service_TCP" | "Monitor")
    }
}

/// Named children of one AS3 level.
///
/// Objects whose `class` is modelled by `T` decode into `typed`; every other
/// key (unmodelled classes, scalar properties such as `updateMode`) is kept
/// verbatim in `extra` and written back on encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMembers<T> {
    pub typed: BTreeMap<String, T>,
    pub extra: Map<String, Value>,
}

impl<T> Default for ClassMembers<T> {
    fn default() -> Self {
        Self { typed: BTreeMap::new(), extra: Map::new() }
    }
}

impl<T> ClassMembers<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.typed.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.typed.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, node: T) -> Option<T> {
        self.typed.insert(name.into(), node)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.typed.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.typed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.typed.is_empty()
    }
}

impl<T> Index<&str> for ClassMembers<T> {
    type Output = T;

    fn index(&self, name: &str) -> &T {
        &self.typed[name]
    }
}

impl<T: Serialize> Serialize for ClassMembers<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.typed.len() + self.extra.len()))?;
        for (name, node) in &self.typed {
            map.serialize_entry(name, node)?;
        }
        for (name, value) in &self.extra {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de, T: As3Class + DeserializeOwned> Deserialize<'de> for ClassMembers<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = Map::<String, Value>::deserialize(deserializer)?;
        let mut members = Self::default();
        for (name, value) in entries {
            let modelled = value.get("class").and_then(Value::as_str).is_some_and(T::accepts);
            if modelled {
                // A known class that fails to decode is an error, not an extra.
                let node = serde_json::from_value(value)
                    .map_err(|e| de::Error::custom(format!("'{}': {}", name, e)))?;
                members.typed.insert(name, node);
            } else {
                members.extra.insert(name, value);
            }
        }
        Ok(members)
    }
}

/// Reference to another object: a bare name, `{"use": ...}` or `{"bigip": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum As3Pointer {
    Name(String),
    Use {
        #[serde(rename = "use")]
        target: String,
    },
    Bigip {
        bigip: String,
    },
}

impl From<&str> for As3Pointer {
    fn from(name: &str) -> Self {
        As3Pointer::Name(name.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct As3Pool {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<As3PoolMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monitors: Vec<As3Pointer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancing_mode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct As3PoolMember {
    pub service_port: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_nodes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body shared by `Service_HTTP`, `Service_HTTPS` and `Service_TCP`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct As3Service {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<As3Pointer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_port: Option<u16>,
    /// `"auto"`, `"none"`, `"self"` or a pointer to a SNAT pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snat: Option<Value>,
    #[serde(rename = "serverTLS", default, skip_serializing_if = "Option::is_none")]
    pub server_tls: Option<As3Pointer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct As3Monitor {
    pub monitor_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl As3Request {
    pub fn new(declaration: Adc) -> Self {
        Self { class: as3_class(), action: None, persist: None, declaration, extra: Map::new() }
    }

    /// One HTTP virtual server on `10.0.2.10:80` balancing two members of
    /// `web_pool2`, placed in the `Shared` application of `tenant`.
    pub fn sample(tenant: &str) -> Self {
        let pool = As3Pool {
            members: vec![As3PoolMember {
                service_port: 80,
                server_addresses: vec!["192.0.2.10".to_string(), "192.0.2.11".to_string()],
                ..Default::default()
            }],
            monitors: vec![As3Pointer::from("http")],
            ..Default::default()
        };

        let service = As3Service {
            virtual_addresses: vec!["10.0.2.10".to_string()],
            pool: Some(As3Pointer::from("web_pool2")),
            virtual_port: Some(80),
            snat: Some(Value::String("auto".to_string())),
            ..Default::default()
        };

        let shared = Application::shared()
            .with_item("web_pool2", As3Item::Pool(pool))
            .with_item("Virtual_server", As3Item::ServiceHttp(service));

        let adc = Adc::new(DEFAULT_SCHEMA_VERSION)
            .with_tenant(tenant, Tenant::new().with_application("Shared", shared));

        Self::new(adc)
    }
}

impl Adc {
    pub fn new(schema_version: &str) -> Self {
        Self {
            class: adc_class(),
            schema_version: schema_version.to_string(),
            id: None,
            label: None,
            remark: None,
            controls: None,
            tenants: ClassMembers::default(),
        }
    }

    pub fn with_tenant(mut self, name: &str, tenant: Tenant) -> Self {
        self.tenants.insert(name, tenant);
        self
    }

    pub fn tenant_names(&self) -> impl Iterator<Item = &str> {
        self.tenants.keys()
    }
}

impl Tenant {
    pub fn new() -> Self {
        Self {
            class: tenant_class(),
            label: None,
            remark: None,
            default_route_domain: None,
            applications: ClassMembers::default(),
        }
    }

    pub fn with_application(mut self, name: &str, application: Application) -> Self {
        self.applications.insert(name, application);
        self
    }
}

impl Default for Tenant {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    pub fn new() -> Self {
        Self {
            class: application_class(),
            template: None,
            label: None,
            remark: None,
            items: ClassMembers::default(),
        }
    }

    /// Application using the `shared` template
    pub fn shared() -> Self {
        Self { template: Some("shared".to_string()), ..Self::new() }
    }

    pub fn with_item(mut self, name: &str, item: As3Item) -> Self {
        self.items.insert(name, item);
        self
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_tagged_by_class() {
        let item: As3Item = serde_json::from_value(json!({
            "class": "Service_HTTPS",
            "virtualAddresses": ["10.0.1.10"],
            "serverTLS": {"bigip": "/Common/clientssl"},
            "redirect80": false
        }))
        .unwrap();

        match &item {
            As3Item::ServiceHttps(svc) => {
                assert_eq!(svc.virtual_addresses, vec!["10.0.1.10"]);
                assert_eq!(svc.extra.get("redirect80"), Some(&json!(false)));
                assert_eq!(
                    svc.server_tls,
                    Some(As3Pointer::Bigip { bigip: "/Common/clientssl".into() })
                );
            }
            other => panic!("expected Service_HTTPS, got {:?}", other),
        }

        let wire = serde_json::to_value(&item).unwrap();
        assert_eq!(wire["class"], "Service_HTTPS");
        assert_eq!(wire["redirect80"], false);
    }

    #[test]
    fn test_unmodelled_class_kept_beside_items() {
        let wire = json!({
            "class": "Application",
            "template": "https",
            "webcert": {"class": "Certificate", "certificate": "-----BEGIN CERTIFICATE-----"},
            "webtls": {"class": "TLS_Server", "certificates": [{"certificate": "webcert"}]},
            "web_pool": {"class": "Pool", "monitors": ["http"]}
        });

        let app: Application = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(app.items.keys().collect::<Vec<_>>(), vec!["web_pool"]);
        assert_eq!(app.items.extra["webtls"]["class"], "TLS_Server");
        assert_eq!(serde_json::to_value(&app).unwrap(), wire);
    }

    #[test]
    fn test_known_class_with_bad_body_is_an_error() {
        let result: Result<Application, _> = serde_json::from_value(json!({
            "class": "Application",
            "mon": {"class": "Monitor", "interval": "often"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_pointer_forms() {
        let pointers: Vec<As3Pointer> =
            serde_json::from_value(json!(["http", {"use": "mon1"}, {"bigip": "/Common/tcp"}]))
                .unwrap();
        assert_eq!(pointers[0], As3Pointer::Name("http".into()));
        assert_eq!(pointers[1], As3Pointer::Use { target: "mon1".into() });
        assert_eq!(pointers[2], As3Pointer::Bigip { bigip: "/Common/tcp".into() });
    }

    #[test]
    fn test_declaration_decodes_tenants_beside_fixed_keys() {
        let adc: Adc = serde_json::from_value(json!({
            "class": "ADC",
            "schemaVersion": "3.20.0",
            "id": "decl-1",
            "Tenant_A": {"class": "Tenant", "App": {"class": "Application"}},
            "Tenant_B": {"class": "Tenant"}
        }))
        .unwrap();

        assert_eq!(adc.id.as_deref(), Some("decl-1"));
        assert_eq!(adc.tenant_names().collect::<Vec<_>>(), vec!["Tenant_A", "Tenant_B"]);
        assert!(adc.tenants["Tenant_A"].applications.contains_key("App"));
    }

    #[test]
    fn test_scalar_properties_beside_tenants_round_trip() {
        let wire = json!({
            "$schema": "https://raw.githubusercontent.com/F5Networks/f5-appsvcs-extension/main/schema/latest/as3-schema.json",
            "class": "AS3",
            "action": "deploy",
            "logLevel": "debug",
            "declaration": {
                "class": "ADC",
                "schemaVersion": "3.36.0",
                "updateMode": "selective",
                "Tenant_A": {
                    "class": "Tenant",
                    "enable": true,
                    "App": {"class": "Application", "schemaOverlay": "v1"}
                }
            }
        });

        let request: As3Request = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(request.declaration.tenants.extra["updateMode"], "selective");
        assert_eq!(request.declaration.tenants["Tenant_A"].applications.extra["enable"], true);
        assert_eq!(request.extra["logLevel"], "debug");
        assert_eq!(serde_json::to_value(&request).unwrap(), wire);
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(serde_json::to_value(As3Action::DryRun).unwrap(), json!("dry-run"));
        assert_eq!(serde_json::to_value(As3Action::Deploy).unwrap(), json!("deploy"));
    }
}
