//! End-to-end tests of `PushoverNotifier` over the reqwest transport,
//! against a local mock of the Pushover messages endpoint.

use std::time::Duration;

use httpmock::prelude::*;

use pushover_gateway::{
    GatewayConfig, GatewayError, NotificationRequest, Notifier, Outcome, Overrides,
    PushoverNotifier, Timeouts,
};

fn notifier_for(server: &MockServer) -> PushoverNotifier {
    let config = GatewayConfig::new("app-token")
        .unwrap()
        .with_endpoint(server.base_url());
    PushoverNotifier::from_config(config).unwrap()
}

#[tokio::test]
async fn posts_form_and_maps_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/1/messages.json")
                .header("content-type", "application/x-www-form-urlencoded")
                .header("accept", "application/json")
                .body_contains("token=app-token")
                .body_contains("user=uKey123")
                .body_contains("message=hello")
                .body_contains("sound=bike");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"status":1,"request":"647d2300-702c-4b38-8b2f-d56326ae460b"}"#);
        })
        .await;

    let request = NotificationRequest::new("uKey123", "hello").with_overrides(Overrides {
        sound: Some("bike".to_string()),
        ..Overrides::default()
    });
    let result = notifier_for(&server).notify(&request).await.unwrap();

    mock.assert_async().await;
    assert!(result.success);
    assert_eq!(result.outcome, Outcome::Delivered);
    assert_eq!(result.message, "Message sent");
    assert_eq!(
        result.request_id.as_deref(),
        Some("647d2300-702c-4b38-8b2f-d56326ae460b")
    );
}

#[tokio::test]
async fn provider_rejection_joins_errors() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/1/messages.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"status":0,"errors":["invalid token","invalid user"]}"#);
        })
        .await;

    let result = notifier_for(&server)
        .notify(&NotificationRequest::new("nobody", "hi"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(!result.success);
    assert_eq!(result.outcome, Outcome::ProviderRejected);
    assert_eq!(result.message, "invalid token, invalid user");
}

#[tokio::test]
async fn bad_gateway_is_reported_not_raised() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/1/messages.json");
            then.status(502).body("bad gateway");
        })
        .await;

    let result = notifier_for(&server)
        .notify(&NotificationRequest::new("u", "m"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(!result.success);
    assert_eq!(result.status_code, 502);
    assert_eq!(result.raw, "bad gateway");
    assert!(result.message.contains("bad gateway"));
}

#[tokio::test]
async fn each_call_is_one_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/1/messages.json");
            then.status(200).body(r#"{"status":1}"#);
        })
        .await;

    let notifier = notifier_for(&server);
    let request = NotificationRequest::new("u", "m");
    notifier.notify(&request).await.unwrap();
    notifier.notify(&request).await.unwrap();

    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn connection_failure_is_an_error() {
    let config = GatewayConfig::new("app-token")
        .unwrap()
        .with_endpoint("http://127.0.0.1:1");
    let notifier = PushoverNotifier::from_config(config).unwrap();

    let err = notifier
        .notify(&NotificationRequest::new("u", "m"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Http(_)));
}

#[tokio::test]
async fn slow_provider_hits_overall_timeout() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/1/messages.json");
            then.status(200)
                .delay(Duration::from_secs(2))
                .body(r#"{"status":1}"#);
        })
        .await;

    let config = GatewayConfig::new("app-token")
        .unwrap()
        .with_endpoint(server.base_url())
        .with_timeouts(Timeouts {
            overall: Duration::from_millis(200),
            ..Timeouts::default()
        });
    let notifier = PushoverNotifier::from_config(config).unwrap();

    let err = notifier
        .notify(&NotificationRequest::new("u", "m"))
        .await
        .unwrap_err();

    match err {
        GatewayError::Http(e) => assert!(e.is_timeout(), "expected timeout, got: {e}"),
        other => panic!("expected Http error, got: {other:?}"),
    }
}
