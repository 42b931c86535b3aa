//! AS3 document shape and tenant-scoped deployment.

mod common;

use bigip::as3::{As3Action, As3Context, As3Item, As3Request};
use bigip::BigIpError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::fake_appliance;

fn sample_json() -> serde_json::Value {
    json!({
        "class": "AS3",
        "declaration": {
            "class": "ADC",
            "schemaVersion": "3.15.0",
            "Sample_01": {
                "class": "Tenant",
                "Shared": {
                    "class": "Application",
                    "template": "shared",
                    "web_pool2": {
                        "class": "Pool",
                        "members": [{"servicePort": 80, "serverAddresses": ["192.0.2.10", "192.0.2.11"]}],
                        "monitors": ["http"]
                    },
                    "Virtual_server": {
                        "class": "Service_HTTP",
                        "virtualAddresses": ["10.0.2.10"],
                        "pool": "web_pool2",
                        "virtualPort": 80,
                        "snat": "auto"
                    }
                }
            }
        }
    })
}

#[test]
fn test_sample_declaration_matches_documented_shape() {
    let request = As3Request::sample("Sample_01");
    assert_eq!(serde_json::to_value(&request).unwrap(), sample_json());
}

#[test]
fn test_documented_declaration_decodes_into_typed_tree() {
    let request: As3Request = serde_json::from_value(sample_json()).unwrap();
    assert_eq!(request, As3Request::sample("Sample_01"));

    let shared = &request.declaration.tenants["Sample_01"].applications["Shared"];
    assert!(matches!(shared.items["web_pool2"], As3Item::Pool(_)));
    assert!(matches!(shared.items["Virtual_server"], As3Item::ServiceHttp(_)));
}

#[test]
fn test_unmodelled_properties_survive_round_trip() {
    let mut doc = sample_json();
    doc["declaration"]["Sample_01"]["Shared"]["Virtual_server"]["persistenceMethods"] = json!(["cookie"]);
    doc["declaration"]["Sample_01"]["Shared"]["web_pool2"]["members"][0]["ratio"] = json!(5);

    let request: As3Request = serde_json::from_value(doc.clone()).unwrap();
    assert_eq!(serde_json::to_value(&request).unwrap(), doc);
}

#[tokio::test]
async fn test_deploy_posts_declaration_with_context_overrides() {
    let (server, bigip) = fake_appliance().await;

    let mut expected = sample_json();
    expected["action"] = json!("deploy");
    expected["persist"] = json!(true);

    Mock::given(method("POST"))
        .and(path("/mgmt/shared/appsvcs/declare"))
        .and(body_json(expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"code": 200, "message": "success", "tenant": "Sample_01", "host": "localhost", "runTime": 1450}],
            "declaration": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = As3Context::new("Sample_01").with_action(As3Action::Deploy).with_persist(true);
    let results = bigip.deploy_as3(&ctx, &As3Request::sample("Sample_01")).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].message, "success");
}

#[tokio::test]
async fn test_deploy_forwards_unmodelled_classes_and_properties() {
    let (server, bigip) = fake_appliance().await;

    let mut doc = sample_json();
    doc["$schema"] = json!("https://raw.githubusercontent.com/F5Networks/f5-appsvcs-extension/main/schema/latest/as3-schema.json");
    doc["declaration"]["updateMode"] = json!("selective");
    doc["declaration"]["Sample_01"]["Shared"]["webtls"] =
        json!({"class": "TLS_Server", "certificates": [{"certificate": "webcert"}]});
    let request: As3Request = serde_json::from_value(doc.clone()).unwrap();

    Mock::given(method("POST"))
        .and(path("/mgmt/shared/appsvcs/declare"))
        .and(body_json(doc))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"code": 200, "message": "success", "tenant": "Sample_01"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    bigip.deploy_as3(&As3Context::new("Sample_01"), &request).await.unwrap();
}

#[tokio::test]
async fn test_deploy_rejects_missing_tenant_before_request() {
    let (server, bigip) = fake_appliance().await;
    Mock::given(method("POST"))
        .and(path("/mgmt/shared/appsvcs/declare"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = bigip
        .deploy_as3(&As3Context::new("Sample_02"), &As3Request::sample("Sample_01"))
        .await
        .unwrap_err();
    assert!(matches!(err, BigIpError::Validation { .. }));
}

#[tokio::test]
async fn test_deploy_reports_failed_tenant_result() {
    let (server, bigip) = fake_appliance().await;
    Mock::given(method("POST"))
        .and(path("/mgmt/shared/appsvcs/declare"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"code": 422, "message": "declaration is invalid", "tenant": "Sample_01"}]
        })))
        .mount(&server)
        .await;

    let err = bigip
        .deploy_as3(&As3Context::new("Sample_01"), &As3Request::sample("Sample_01"))
        .await
        .unwrap_err();
    assert!(matches!(err, BigIpError::Domain { .. }));
    assert!(err.to_string().contains("declaration is invalid"));
}

#[tokio::test]
async fn test_get_and_delete_tenant() {
    let (server, bigip) = fake_appliance().await;

    Mock::given(method("GET"))
        .and(path("/mgmt/shared/appsvcs/declare/Sample_01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_json()["declaration"].clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mgmt/shared/appsvcs/declare/Unknown"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/mgmt/shared/appsvcs/declare/Sample_01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let tenant = bigip.get_as3_tenant("Sample_01").await.unwrap().unwrap();
    assert_eq!(tenant["schemaVersion"], "3.15.0");
    assert!(bigip.get_as3_tenant("Unknown").await.unwrap().is_none());

    bigip.delete_as3_tenant("Sample_01").await.unwrap();
}
