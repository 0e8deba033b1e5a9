// Integration tests for `BackendClient` using wiremock.

#![allow(clippy::float_cmp)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netpulse_api::{BackendClient, Error, LogDetails};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BackendClient) {
    let server = MockServer::start().await;
    let base = server.uri().parse().expect("mock server URI is a URL");
    let client = BackendClient::from_reqwest(base, reqwest::Client::new());
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_system() {
    let (server, client) = setup().await;

    let body = json!({
        "cpu_percent": 42.0,
        "memory": 55.0,
        "disk": 10.0,
        "timestamp": "2026-08-29T12:00:00+00:00"
    });

    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let sample = client.get_system().await.expect("system fetch succeeds");

    assert_eq!(sample.cpu_percent, 42.0);
    assert_eq!(sample.memory, 55.0);
    assert_eq!(sample.disk, 10.0);
    assert_eq!(sample.timestamp, "2026-08-29T12:00:00+00:00");
}

#[tokio::test]
async fn test_scan_devices() {
    let (server, client) = setup().await;

    let body = json!({
        "local_ip": "192.168.1.10",
        "devices": [
            { "ip": "192.168.1.1", "status": "alive" },
            { "ip": "192.168.1.42", "status": "alive" },
        ],
        "timestamp": "2026-08-29T12:00:05+00:00"
    });

    Mock::given(method("GET"))
        .and(path("/api/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let scan = client.scan().await.expect("scan succeeds");

    assert_eq!(scan.devices.len(), 2);
    assert_eq!(scan.devices[0].ip, "192.168.1.1");
    assert_eq!(scan.devices[1].status, "alive");
    assert_eq!(scan.local_ip.as_deref(), Some("192.168.1.10"));
}

#[tokio::test]
async fn test_request_advice_posts_empty_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/ai-advisor"))
        .and(body_json(json!({})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "advice_text": "Close port 23\nRotate keys" })),
        )
        .mount(&server)
        .await;

    let advice = client.request_advice().await.expect("advice succeeds");

    assert_eq!(advice.advice_text.as_deref(), Some("Close port 23\nRotate keys"));
    assert!(advice.advice.is_none());
}

#[tokio::test]
async fn test_recent_logs_mixed_details() {
    let (server, client) = setup().await;

    let body = json!({
        "scans": [
            { "ip": "192.168.1.7", "details": "alive", "created_at": "2026-08-29T11:59:00+00:00" },
            { "ip": "AI-ADVISOR", "details": { "advice": "patch the router" } },
        ],
        "system_reports": [
            { "cpu_percent": 12.0, "memory": 33.0, "disk": 71.5, "created_at": "2026-08-29T11:58:00+00:00" },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/recent-logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let logs = client.recent_logs().await.expect("log fetch succeeds");

    assert_eq!(logs.scans.len(), 2);
    assert_eq!(logs.scans[0].details, LogDetails::Text("alive".into()));
    assert!(matches!(logs.scans[1].details, LogDetails::Structured(_)));
    assert_eq!(logs.system_reports.len(), 1);
    // `created_at` rows map onto the sample's timestamp field.
    assert_eq!(
        logs.system_reports[0].timestamp,
        "2026-08-29T11:58:00+00:00"
    );
}

// ── Failure tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_surfaces_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/scan"))
        .respond_with(ResponseTemplate::new(500).set_body_string("scan backend exploded"))
        .mount(&server)
        .await;

    let err = client.scan().await.expect_err("500 should be an error");
    assert!(err.is_transient());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "scan backend exploded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client
        .get_system()
        .await
        .expect_err("non-JSON body should fail");
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>not json</html>"),
        other => panic!("expected Deserialization error, got {other:?}"),
    }
}
