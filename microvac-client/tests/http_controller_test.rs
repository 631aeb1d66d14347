//! End-to-end tests against a real HTTP server
//!
//! A `wiremock` server stands in for the Microvac bridge; the controller uses
//! its default `HttpTransport`.

use microvac_client::{RemoteController, StaticPanel, Trigger};
use microvac_core::{Command, Error, MotionTime};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn controller_for(server: &MockServer) -> RemoteController {
    let mut controller = RemoteController::builder()
        .bind(&StaticPanel::microvac())
        .unwrap();
    controller.set_endpoint(format!("{}/jsonrpc", server.uri()));
    controller
}

#[tokio::test]
async fn test_stop_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"method": "stop", "params": [], "id": 0, "jsonrpc": "2.0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": true})))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let outcome = controller.fire(Trigger::Stop).unwrap().outcome().await.unwrap();

    assert_eq!(outcome, json!({"result": true}));
}

#[tokio::test]
async fn test_expression_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"method": "displayExpression", "params": ["3"], "id": 0, "jsonrpc": "2.0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "result": {"success": "OK"}, "id": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    controller.fire(Trigger::Expression3).unwrap().outcome().await.unwrap();
}

#[tokio::test]
async fn test_http_500_is_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let result = controller.call("forwards", Vec::new()).await;

    assert!(matches!(result, Err(Error::HttpStatus(500))));
}

#[tokio::test]
async fn test_timed_motion_params_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"method": "turnLeft", "params": [750, "ms"], "id": 0, "jsonrpc": "2.0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "result": {"success": "OK"}, "id": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let reply: Value = controller
        .request(&Command::TurnLeft {
            time: Some(MotionTime::millis(750)),
        })
        .await
        .unwrap();

    assert_eq!(reply, json!({"success": "OK"}));
}

#[tokio::test]
async fn test_distance_result_decoded() {
    #[derive(serde::Deserialize)]
    struct Reading {
        data: u32,
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"method": "getDistance", "params": [], "id": 0, "jsonrpc": "2.0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "result": {"success": "OK", "data": 87}, "id": 0
        })))
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let reading: Reading = controller.request(&Command::GetDistance).await.unwrap();

    assert_eq!(reading.data, 87);
}

#[tokio::test]
async fn test_slow_endpoint_leaves_invocation_pending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": true}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let controller = controller_for(&server).await;
    let invocation = controller.fire(Trigger::Forward).unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(300), invocation.outcome()).await;
    assert!(waited.is_err(), "no timeout is applied by default");
}

#[tokio::test]
async fn test_configured_timeout_bounds_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": true}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let mut controller = RemoteController::builder()
        .request_timeout(Duration::from_millis(200))
        .bind(&StaticPanel::microvac())
        .unwrap();
    controller.set_endpoint(server.uri());

    let result = controller.fire(Trigger::Forward).unwrap().outcome().await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
