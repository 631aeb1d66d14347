//! Trigger dispatch integration tests
//!
//! Every panel trigger against an in-memory transport: the envelope on the
//! wire, the missing-endpoint diagnostic, handler delivery and the silent
//! failure paths.

mod common;

use common::{MockTransport, RecordingDiagnostics};
use microvac_client::{
    ControllerBuilder, Diagnostic, IdStrategy, RemoteController, StaticPanel, Trigger,
};
use microvac_core::{Error, Id};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const ENDPOINT: &str = "http://localhost:4000/jsonrpc";

fn controller(
    transport: Arc<MockTransport>,
    diagnostics: Arc<RecordingDiagnostics>,
) -> RemoteController {
    ControllerBuilder::new()
        .transport(transport)
        .diagnostics(diagnostics)
        .bind(&StaticPanel::microvac())
        .unwrap()
}

#[tokio::test]
async fn test_every_trigger_sends_one_envelope() {
    let expected = [
        (Trigger::Forward, "forwards", json!([])),
        (Trigger::TurnLeft, "turnLeft", json!([])),
        (Trigger::Stop, "stop", json!([])),
        (Trigger::TurnRight, "turnRight", json!([])),
        (Trigger::Backward, "backwards", json!([])),
        (Trigger::Expression1, "displayExpression", json!(["1"])),
        (Trigger::Expression2, "displayExpression", json!(["2"])),
        (Trigger::Expression3, "displayExpression", json!(["3"])),
    ];

    for (trigger, method, params) in expected {
        let transport = MockTransport::new();
        let mut controller = controller(transport.clone(), RecordingDiagnostics::new());
        controller.set_endpoint(ENDPOINT);

        controller.fire(trigger).unwrap().outcome().await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1, "{} should send exactly one request", trigger);
        assert_eq!(sent[0].endpoint, ENDPOINT);
        assert_eq!(
            sent[0].json(),
            json!({"method": method, "params": params, "id": 0, "jsonrpc": "2.0"}),
            "{}",
            trigger
        );
    }
}

#[tokio::test]
async fn test_expression2_body_is_exact() {
    let transport = MockTransport::new();
    let mut controller = controller(transport.clone(), RecordingDiagnostics::new());
    controller.set_endpoint(ENDPOINT);

    controller.fire(Trigger::Expression2).unwrap().outcome().await.unwrap();

    assert_eq!(
        transport.sent()[0].body,
        r#"{"method":"displayExpression","params":["2"],"id":0,"jsonrpc":"2.0"}"#
    );
}

#[tokio::test]
async fn test_trigger_without_endpoint_sends_nothing() {
    for trigger in Trigger::ALL {
        let transport = MockTransport::new();
        let diagnostics = RecordingDiagnostics::new();
        let controller = controller(transport.clone(), diagnostics.clone());

        assert!(controller.fire(trigger).is_none());

        tokio::task::yield_now().await;
        assert!(transport.sent().is_empty(), "{} must not send", trigger);
        assert_eq!(
            diagnostics.reports(),
            vec![Diagnostic::EndpointNotSet {
                method: trigger.command().method().to_string()
            }]
        );
    }
}

#[tokio::test]
async fn test_handler_receives_parsed_body_once() {
    let transport = MockTransport::with_responder(|req| {
        assert_eq!(req["method"], "stop");
        microvac_client::TransportReply::new(200, r#"{"result": true}"#)
    });
    let mut controller = controller(transport, RecordingDiagnostics::new());
    controller.set_endpoint(ENDPOINT);

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let invocation = controller
        .fire_with(Trigger::Stop, move |body| sink.lock().unwrap().push(body))
        .unwrap();

    let outcome = invocation.outcome().await.unwrap();

    assert_eq!(outcome, json!({"result": true}));
    assert_eq!(*received.lock().unwrap(), vec![json!({"result": true})]);
}

#[tokio::test]
async fn test_server_error_status_is_silent() {
    let transport = MockTransport::with_status(500);
    let diagnostics = RecordingDiagnostics::new();
    let mut controller = controller(transport.clone(), diagnostics.clone());
    controller.set_endpoint(ENDPOINT);

    let calls = Arc::new(AtomicUsize::new(0));
    for trigger in Trigger::ALL {
        let calls = calls.clone();
        let invocation = controller
            .fire_with(trigger, move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        // The failure is still typed for callers that wait
        assert!(matches!(invocation.outcome().await, Err(Error::HttpStatus(500))));
    }

    assert_eq!(transport.sent().len(), 8);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(diagnostics.reports().is_empty());
}

#[tokio::test]
async fn test_unparsable_body_skips_handler() {
    let transport = MockTransport::with_responder(|_| {
        microvac_client::TransportReply::new(200, r#"{"result": tr"#)
    });
    let diagnostics = RecordingDiagnostics::new();
    let mut controller = controller(transport, diagnostics.clone());
    controller.set_endpoint(ENDPOINT);

    let called = Arc::new(AtomicUsize::new(0));
    let flag = called.clone();
    let invocation = controller
        .fire_with(Trigger::Forward, move |_| {
            flag.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    assert!(matches!(invocation.outcome().await, Err(Error::Serialization(_))));
    assert_eq!(called.load(Ordering::SeqCst), 0);
    assert!(diagnostics.reports().is_empty());
}

#[tokio::test]
async fn test_rapid_triggers_are_not_coalesced() {
    let transport = MockTransport::new();
    let mut controller = controller(transport.clone(), RecordingDiagnostics::new());
    controller.set_endpoint(ENDPOINT);

    let first = controller.fire(Trigger::Forward).unwrap();
    let second = controller.fire(Trigger::Forward).unwrap();
    first.outcome().await.unwrap();
    second.outcome().await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].body, sent[1].body);
    assert_eq!(sent[0].json()["method"], "forwards");
}

#[tokio::test]
async fn test_endpoint_set_later_enables_sending() {
    let transport = MockTransport::new();
    let diagnostics = RecordingDiagnostics::new();
    let mut controller = controller(transport.clone(), diagnostics.clone());

    assert!(controller.fire(Trigger::Stop).is_none());
    controller.set_endpoint(ENDPOINT);
    controller.fire(Trigger::Stop).unwrap().outcome().await.unwrap();

    assert_eq!(transport.sent().len(), 1);
    assert_eq!(diagnostics.reports().len(), 1);
}

#[tokio::test]
async fn test_sequential_ids() {
    let transport = MockTransport::new();
    let mut controller = ControllerBuilder::new()
        .transport(transport.clone())
        .diagnostics(RecordingDiagnostics::new())
        .id_strategy(IdStrategy::Sequential)
        .bind(&StaticPanel::microvac())
        .unwrap();
    controller.set_endpoint(ENDPOINT);

    let a = controller.fire(Trigger::Forward).unwrap();
    let b = controller.fire(Trigger::Stop).unwrap();
    assert_eq!(a.id(), &Id::Number(0));
    assert_eq!(b.id(), &Id::Number(1));
    a.outcome().await.unwrap();
    b.outcome().await.unwrap();

    let mut ids: Vec<_> = transport.sent().iter().map(|r| r.json()["id"].clone()).collect();
    ids.sort_by_key(|v| v.as_i64());
    assert_eq!(ids, vec![json!(0), json!(1)]);
}

#[test]
fn test_missing_control_fails_construction() {
    let panel = StaticPanel::microvac().without("button-fwd");
    let result = RemoteController::bind(&panel, MockTransport::new());
    assert!(matches!(result, Err(Error::MissingControl(id)) if id == "button-fwd"));
}

#[tokio::test]
async fn test_created_status_skips_handler() {
    let transport = MockTransport::with_responder(|_| {
        microvac_client::TransportReply::new(201, r#"{"result": true}"#)
    });
    let mut controller = controller(transport, RecordingDiagnostics::new());
    controller.set_endpoint(ENDPOINT);

    let called = Arc::new(AtomicUsize::new(0));
    let flag = called.clone();
    let invocation = controller
        .fire_with(Trigger::Stop, move |_| {
            flag.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    assert!(matches!(invocation.outcome().await, Err(Error::HttpStatus(201))));
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_finite_wait_is_not_sent() {
    let transport = MockTransport::new();
    let mut controller = controller(transport.clone(), RecordingDiagnostics::new());
    controller.set_endpoint(ENDPOINT);

    let result = controller.request::<serde_json::Value>(&microvac_core::Command::Wait(f64::NAN)).await;

    assert!(matches!(result, Err(Error::InvalidParams(_))));
    assert!(controller.send(&microvac_core::Command::Wait(f64::INFINITY)).is_none());
    assert!(transport.sent().is_empty());
}
