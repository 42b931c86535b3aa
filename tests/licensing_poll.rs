//! Bounded license member polling against a scripted fake license manager.

mod common;

use bigip::licensing::LicenseAssignment;
use bigip::BigIpError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{fake_appliance, instant_poll};

const POOL_ID: &str = "0f2d6c57-pool";
const REGKEY: &str = "ABCDE-FGHIJ-KLMNO-PQRST-UVWXYZZ";
const MEMBER_ID: &str = "7a1e3b9c-member";

fn member_path() -> String {
    format!(
        "/mgmt/cm/device/licensing/pool/regkey/licenses/{}/offerings/{}/members/{}",
        POOL_ID, REGKEY, MEMBER_ID
    )
}

fn member_with_status(status: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": MEMBER_ID,
        "deviceAddress": "10.1.1.4",
        "status": status
    }))
}

async fn respond_once(server: &MockServer, status: &str) {
    Mock::given(method("GET"))
        .and(path(member_path()))
        .respond_with(member_with_status(status))
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_poll_until_licensed() {
    let (server, bigip) = fake_appliance().await;
    respond_once(&server, "INSTALLING").await;
    respond_once(&server, "INSTALLING").await;
    respond_once(&server, "LICENSED").await;

    let member = bigip
        .poll_license_member(POOL_ID, REGKEY, MEMBER_ID, &instant_poll(10))
        .await
        .unwrap();
    assert_eq!(member.status, "LICENSED");
}

#[tokio::test]
async fn test_installation_failed_stops_immediately() {
    let (server, bigip) = fake_appliance().await;
    respond_once(&server, "INSTALLING").await;
    Mock::given(method("GET"))
        .and(path(member_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": MEMBER_ID,
            "status": "INSTALLATION_FAILED",
            "message": "Device unreachable"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = bigip
        .poll_license_member(POOL_ID, REGKEY, MEMBER_ID, &instant_poll(10))
        .await
        .unwrap_err();

    match err {
        BigIpError::License { member_id, message } => {
            assert_eq!(member_id, MEMBER_ID);
            assert_eq!(message, "Device unreachable");
        }
        other => panic!("expected license error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_poll_gives_up_after_max_attempts() {
    let (server, bigip) = fake_appliance().await;
    Mock::given(method("GET"))
        .and(path(member_path()))
        .respond_with(member_with_status("INSTALLING"))
        .expect(3)
        .mount(&server)
        .await;

    let err = bigip
        .poll_license_member(POOL_ID, REGKEY, MEMBER_ID, &instant_poll(3))
        .await
        .unwrap_err();

    assert!(matches!(err, BigIpError::Timeout { attempts: 3, .. }));
}

#[tokio::test]
async fn test_missing_member_is_domain_error() {
    let (server, bigip) = fake_appliance().await;
    Mock::given(method("GET"))
        .and(path(member_path()))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = bigip
        .poll_license_member(POOL_ID, REGKEY, MEMBER_ID, &instant_poll(5))
        .await
        .unwrap_err();
    assert!(matches!(err, BigIpError::Domain { .. }));
}

#[tokio::test]
async fn test_assign_license_by_pool_name() {
    let (server, bigip) = fake_appliance().await;

    Mock::given(method("GET"))
        .and(path("/mgmt/cm/device/licensing/pool/regkey/licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "other-pool", "name": "staging"},
                {"id": POOL_ID, "name": "lab_pool"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/mgmt/cm/device/licensing/pool/regkey/licenses/{}/offerings/{}/members",
            POOL_ID, REGKEY
        )))
        .and(body_json(json!({"deviceAddress": "10.1.1.4", "username": "admin", "password": "pw"})))
        .respond_with(member_with_status("INSTALLING"))
        .expect(1)
        .mount(&server)
        .await;

    let pool_id = bigip.regkey_pool_id("lab_pool").await.unwrap();
    assert_eq!(pool_id, POOL_ID);

    let member = bigip
        .assign_license(
            &pool_id,
            REGKEY,
            &LicenseAssignment {
                device_address: "10.1.1.4".into(),
                username: Some("admin".into()),
                password: Some("pw".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(member.id, MEMBER_ID);

    let err = bigip.regkey_pool_id("prod").await.unwrap_err();
    assert!(matches!(err, BigIpError::Domain { .. }));
}

#[tokio::test]
async fn test_revoke_license() {
    let (server, bigip) = fake_appliance().await;
    Mock::given(method("DELETE"))
        .and(path(member_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": MEMBER_ID})))
        .expect(1)
        .mount(&server)
        .await;

    bigip.revoke_license(POOL_ID, REGKEY, MEMBER_ID).await.unwrap();
}
