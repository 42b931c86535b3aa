//! URI segments of the management API and the path-joining rule shared by
//! every verb.

pub const MGMT: &str = "mgmt";
pub const TM: &str = "tm";
pub const SHARED: &str = "shared";
pub const CM: &str = "cm";

pub const LTM: &str = "ltm";
pub const NET: &str = "net";
pub const GTM: &str = "gtm";
pub const ASM: &str = "asm";
pub const ILX: &str = "ilx";
pub const UTIL: &str = "util";

pub const POOL: &str = "pool";
pub const MEMBERS: &str = "members";
pub const NODE: &str = "node";
pub const VIRTUAL: &str = "virtual";
pub const MONITOR: &str = "monitor";
pub const RULE: &str = "rule";
pub const VLAN: &str = "vlan";
pub const SELF: &str = "self";
pub const ROUTE: &str = "route";
pub const DATACENTER: &str = "datacenter";
pub const SERVER: &str = "server";
pub const WIDEIP: &str = "wideip";
pub const POLICIES: &str = "policies";
pub const WORKSPACE: &str = "workspace";
pub const BASH: &str = "bash";

pub const APPSVCS: &str = "appsvcs";
pub const DECLARE: &str = "declare";
pub const FAST: &str = "fast";
pub const APPLICATIONS: &str = "applications";
pub const TASKS: &str = "tasks";
pub const FILE_TRANSFER: &str = "file-transfer";
pub const UPLOADS: &str = "uploads";
pub const AUTHN: &str = "authn";
pub const LOGIN: &str = "login";

pub const DEVICE: &str = "device";
pub const LICENSING: &str = "licensing";
pub const REGKEY: &str = "regkey";
pub const LICENSES: &str = "licenses";
pub const OFFERINGS: &str = "offerings";

/// Directory the file-transfer endpoint writes uploads into
pub const UPLOAD_DIR: &str = "/var/config/rest/downloads";

/// Join path segments positionally with `/`.
///
/// Empty segments are kept, so a trailing `""` produces a trailing `/`.
/// A `/` inside a segment becomes `~`, which is how the appliance addresses
/// partitioned objects (`/Common/web` -> `~Common~web`). Everything outside
/// the unreserved set is percent-encoded so `?`, `#` and `%` stay in the path.
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| urlencoding::encode(&s.replace('/', "~")).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Prefix a bare object name with its partition (`web` -> `/Common/web`).
pub fn full_path(partition: &str, name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{}/{}", partition.trim_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters_are_encoded() {
        assert_eq!(join_path(&[MGMT, TM, LTM, POOL, "/Common/a?b#c"]), "mgmt/tm/ltm/pool/~Common~a%3Fb%23c");
        assert_eq!(join_path(&[MGMT, TM, LTM, NODE, "100%"]), "mgmt/tm/ltm/node/100%25");
        assert_eq!(join_path(&["my pool"]), "my%20pool");
        assert_eq!(join_path(&["web_pool-2.v1"]), "web_pool-2.v1");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(&[MGMT, SHARED, FAST, APPLICATIONS]), "mgmt/shared/fast/applications");
    }

    #[test]
    fn test_trailing_empty_segment_is_kept() {
        let with_empty = join_path(&["tenantName", "appName", ""]);
        let without = join_path(&["tenantName", "appName"]);
        assert_eq!(with_empty, "tenantName/appName/");
        assert_eq!(without, "tenantName/appName");
        assert_ne!(with_empty, without);
    }

    #[test]
    fn test_partitioned_names_are_tilde_encoded() {
        assert_eq!(join_path(&[MGMT, TM, LTM, POOL, "/Common/web"]), "mgmt/tm/ltm/pool/~Common~web");
    }

    #[test]
    fn test_full_path() {
        assert_eq!(full_path("Common", "web"), "/Common/web");
        assert_eq!(full_path("/Common/", "web"), "/Common/web");
        assert_eq!(full_path("Common", "/Tenant/web"), "/Tenant/web");
    }
}
