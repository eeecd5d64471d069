//! End-to-end tests driving the reconciler through a real HTTP client
//! against a mocked ToadLester service.

use toadlester_reconcile::config::ClientConfig;
use toadlester_reconcile::identity::is_timestamp_tag;
use toadlester_reconcile::{DriftStatus, ErrorKind, Reconciler, Setting, ToadlesterClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Harness
// ============================================================================

fn int_size() -> Setting {
    Setting::new("INT_SIZE", "100", "up")
}

fn reconciler_for(server: &MockServer) -> Reconciler<ToadlesterClient> {
    let client = ToadlesterClient::new(&ClientConfig::new(server.uri())).unwrap();
    Reconciler::new(client)
}

async fn mount_reseed(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn create_echo_scenario() {
    let server = MockServer::start().await;
    mount_reseed(&server, "/INT_SIZE/100", "Set new up value INT_SIZE for 100").await;

    let result = reconciler_for(&server).create(&int_size()).await.unwrap();

    assert_eq!(result.setting, int_size());
    assert!(result.identity.as_str().starts_with("INT_SIZE_"));
    assert!(is_timestamp_tag(result.identity.as_str(), "INT_SIZE"));
}

#[tokio::test]
async fn create_update_delete_are_identical() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/INT_SIZE/100"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Set new up value INT_SIZE for 100\n"),
        )
        .expect(3)
        .mount(&server)
        .await;

    let reconciler = reconciler_for(&server);
    let set = int_size();
    let results = [
        reconciler.create(&set).await.unwrap(),
        reconciler.update(&set).await.unwrap(),
        reconciler.delete(&set).await.unwrap(),
    ];

    for result in &results {
        assert_eq!(result.setting, set);
        assert!(is_timestamp_tag(result.identity.as_str(), "INT_SIZE"));
    }
}

#[tokio::test]
async fn create_rejected_text_is_validation_error() {
    let server = MockServer::start().await;
    mount_reseed(&server, "/INT_SIZE/100", "ok").await;

    let err = reconciler_for(&server).create(&int_size()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn read_surfaces_drifted_value() {
    let server = MockServer::start().await;
    mount_reseed(&server, "/series/int/up", r#"{"INT_SIZE": "42"}"#).await;

    let result = reconciler_for(&server).read(&int_size()).await.unwrap();
    assert_eq!(result.setting.name, "INT_SIZE");
    assert_eq!(result.setting.value, "42");
    assert_eq!(result.setting.algo, "up");
}

#[tokio::test]
async fn read_missing_key_is_drift_error() {
    let server = MockServer::start().await;
    mount_reseed(&server, "/series/int/up", r#"{"OTHER_SIZE": "1"}"#).await;

    let err = reconciler_for(&server).read(&int_size()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Drift);
}

#[tokio::test]
async fn read_plain_text_is_parse_error() {
    let server = MockServer::start().await;
    mount_reseed(&server, "/series/int/up", "Metric_int_up: 42\n").await;

    let err = reconciler_for(&server).read(&int_size()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn create_then_read_keeps_name() {
    let server = MockServer::start().await;
    mount_reseed(&server, "/INT_SIZE/100", "Set new up value INT_SIZE for 100").await;
    mount_reseed(&server, "/series/int/up", r#"{"INT_SIZE": "7", "INT_LIMIT": "100"}"#).await;

    let reconciler = reconciler_for(&server);
    let created = reconciler.create(&int_size()).await.unwrap();
    let observed = reconciler.read(&created.setting).await.unwrap();
    assert_eq!(observed.setting.name, "INT_SIZE");
}

#[tokio::test]
async fn read_aggregate_returns_snapshot_and_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"INT_SIZE": "10", "FLOAT_MOD": "1.123"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let aggregate = reconciler_for(&server).read_aggregate().await.unwrap();
    assert_eq!(aggregate.endpoint, server.uri());
    assert_eq!(aggregate.snapshot.len(), 2);
    assert_eq!(aggregate.snapshot.get("FLOAT_MOD"), Some("1.123"));
    assert!(is_timestamp_tag(aggregate.identity.as_str(), "config"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/series//");
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let client = ToadlesterClient::new(&ClientConfig::new("http://127.0.0.1:1")).unwrap();
    let err = Reconciler::new(client).read(&int_size()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
}

// ============================================================================
// Drift and apply
// ============================================================================

#[tokio::test]
async fn apply_converges_missing_and_drifted_settings() {
    let server = MockServer::start().await;
    mount_reseed(&server, "/series/int/up", r#"{"INT_SIZE": "3"}"#).await;
    mount_reseed(&server, "/series/exp/down", r#"{"INT_SIZE": "3"}"#).await;
    mount_reseed(&server, "/INT_SIZE/100", "Set new up value INT_SIZE for 100").await;
    mount_reseed(&server, "/EXP_LIMIT/250", "Set new down value EXP_LIMIT for 250").await;

    let desired = vec![int_size(), Setting::new("EXP_LIMIT", "250", "down")];
    let reconciler = reconciler_for(&server);

    let report = reconciler.check_drift(&desired).await.unwrap();
    assert_eq!(
        report.entries[0].status,
        DriftStatus::Drifted {
            observed: String::from("3")
        }
    );
    assert_eq!(report.entries[1].status, DriftStatus::Missing);

    let result = reconciler.reconcile(&desired).await;
    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.updated, 1);
    assert_eq!(result.created, 1);
}
