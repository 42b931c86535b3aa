//! FAST application lifecycle and task waiting.

mod common;

use bigip::fast::FastParameters;
use bigip::BigIpError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{fake_appliance, instant_poll};

const TASK: &str = "/mgmt/shared/fast/tasks/task-1";

#[tokio::test]
async fn test_wait_returns_finished_task() {
    let (server, bigip) = fake_appliance().await;

    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "task-1", "code": 0, "message": "in progress"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "task-1", "code": 200, "message": "success",
            "tenant": "t1", "application": "app1", "operation": "create"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = bigip.wait_fast_task("task-1", &instant_poll(5)).await.unwrap();
    assert_eq!(task.application.as_deref(), Some("app1"));
}

#[tokio::test]
async fn test_wait_reports_failed_task() {
    let (server, bigip) = fake_appliance().await;
    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "task-1", "code": 422, "message": "parameter validation failed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = bigip.wait_fast_task("task-1", &instant_poll(5)).await.unwrap_err();
    assert!(matches!(err, BigIpError::Domain { .. }));
    assert!(err.to_string().contains("parameter validation failed"));
}

#[tokio::test]
async fn test_wait_times_out() {
    let (server, bigip) = fake_appliance().await;
    Mock::given(method("GET"))
        .and(path(TASK))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "task-1", "code": 0, "message": "in progress"})))
        .expect(2)
        .mount(&server)
        .await;

    let err = bigip.wait_fast_task("task-1", &instant_poll(2)).await.unwrap_err();
    assert!(matches!(err, BigIpError::Timeout { attempts: 2, .. }));
}

#[tokio::test]
async fn test_update_and_delete_application() {
    let (server, bigip) = fake_appliance().await;

    Mock::given(method("PATCH"))
        .and(path("/mgmt/shared/fast/applications/t1/app1"))
        .and(body_json(json!({"parameters": {"virtual_port": 8080}})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"message": [{"id": "task-2"}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/mgmt/shared/fast/applications/t1/app1"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"message": [{"id": "task-3"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut parameters = serde_json::Map::new();
    parameters.insert("virtual_port".into(), json!(8080));
    let task = bigip
        .update_fast_application("t1", "app1", &FastParameters { parameters })
        .await
        .unwrap();
    assert_eq!(task, "task-2");

    bigip.delete_fast_application("t1", "app1").await.unwrap();
}
