#![allow(clippy::unwrap_used)]
// Integration tests for `Coordinator` and `Hub` using wiremock.

use std::time::{Duration, Instant};

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netnest_core::{Coordinator, Hub, HubConfig, HubState};

const STATES_PATH: &str = "/functions/v1/homeassistant-states";

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> HubConfig {
    HubConfig {
        base_url: Url::parse(&server.uri()).unwrap(),
        api_key: "test-key".to_owned().into(),
        poll_interval: Duration::ZERO,
        timeout: Duration::from_secs(5),
        auth_policy: netnest_core::AuthPolicy::default(),
    }
}

fn states_body(bandwidth: f64) -> serde_json::Value {
    json!({
        "bandwidth": bandwidth,
        "connected_devices": 3,
        "network_status": "online",
        "uptime": 168.0,
        "devices": [
            {"id": "device_1", "name": "Living Room TV", "status": "online"}
        ],
        "last_updated": "2024-06-15T10:30:00Z"
    })
}

async fn mount_states(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(STATES_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

// ── Fetch and store ─────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_stores_snapshot_and_reports_has_data() {
    let server = MockServer::start().await;
    mount_states(&server, ResponseTemplate::new(200).set_body_json(states_body(100.0))).await;

    let coordinator = Coordinator::new(config_for(&server)).unwrap();
    assert_eq!(coordinator.state(), HubState::Uninitialized);
    assert!(coordinator.snapshot().is_none());

    coordinator.refresh().await.unwrap();

    assert_eq!(coordinator.state(), HubState::HasData);
    assert!(coordinator.last_error().is_none());
    assert!(coordinator.last_success().is_some());

    let snapshot = coordinator.snapshot().unwrap();
    assert_eq!(snapshot.bandwidth_mbps, Some(100.0));
    assert_eq!(snapshot.devices.len(), 1);
}

#[tokio::test]
async fn test_failed_fetch_preserves_previous_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(states_body(42.0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_states(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({"error": "Database error"})),
    )
    .await;

    let coordinator = Coordinator::new(config_for(&server)).unwrap();
    coordinator.refresh().await.unwrap();
    let stamped = coordinator.last_success().unwrap();

    let err = coordinator.refresh().await.unwrap_err();
    assert!(err.to_string().contains("Database error"));

    // The stored snapshot and its success stamp are untouched.
    assert_eq!(coordinator.state(), HubState::Failed);
    assert_eq!(coordinator.snapshot().unwrap().bandwidth_mbps, Some(42.0));
    assert_eq!(coordinator.last_success().unwrap(), stamped);
    assert!(coordinator.last_error().unwrap().contains("Database error"));
}

#[tokio::test]
async fn test_recovery_after_failure_clears_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(STATES_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_states(&server, ResponseTemplate::new(200).set_body_json(states_body(7.0))).await;

    let coordinator = Coordinator::new(config_for(&server)).unwrap();
    assert!(coordinator.refresh().await.is_err());
    assert_eq!(coordinator.state(), HubState::Failed);

    coordinator.refresh().await.unwrap();
    assert_eq!(coordinator.state(), HubState::HasData);
    assert!(coordinator.last_error().is_none());
    assert_eq!(coordinator.snapshot().unwrap().bandwidth_mbps, Some(7.0));
}

// ── Single-flight refresh ───────────────────────────────────────────

#[tokio::test]
async fn test_concurrent_refreshes_serialize() {
    let server = MockServer::start().await;
    mount_states(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(states_body(1.0))
            .set_delay(Duration::from_millis(300)),
    )
    .await;

    let coordinator = Coordinator::new(config_for(&server)).unwrap();
    let second = coordinator.clone();

    let started = Instant::now();
    let (a, b) = tokio::join!(coordinator.refresh(), second.refresh());
    a.unwrap();
    b.unwrap();

    // Two overlapping fetches would finish in ~300ms; serialized ones
    // need both delays end to end.
    assert!(
        started.elapsed() >= Duration::from_millis(550),
        "refreshes overlapped: {:?}",
        started.elapsed()
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

// ── Periodic polling ────────────────────────────────────────────────

#[tokio::test]
async fn test_poll_loop_fetches_on_cadence() {
    let server = MockServer::start().await;
    mount_states(&server, ResponseTemplate::new(200).set_body_json(states_body(5.0))).await;

    let config = HubConfig {
        poll_interval: Duration::from_millis(100),
        ..config_for(&server)
    };
    let coordinator = Coordinator::new(config).unwrap();
    coordinator.start_polling().await;

    tokio::time::sleep(Duration::from_millis(450)).await;
    coordinator.shutdown().await;

    // First tick is consumed at spawn, so only scheduled ticks fetch.
    let requests = server.received_requests().await.unwrap().len();
    assert!(requests >= 2, "expected at least 2 polls, saw {requests}");
    assert_eq!(coordinator.state(), HubState::HasData);
}

#[tokio::test]
async fn test_shutdown_stops_polling_and_is_idempotent() {
    let server = MockServer::start().await;
    mount_states(&server, ResponseTemplate::new(200).set_body_json(states_body(5.0))).await;

    let config = HubConfig {
        poll_interval: Duration::from_millis(50),
        ..config_for(&server)
    };
    let coordinator = Coordinator::new(config).unwrap();
    coordinator.start_polling().await;
    tokio::time::sleep(Duration::from_millis(120)).await;

    coordinator.shutdown().await;
    let after_shutdown = server.received_requests().await.unwrap().len();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        server.received_requests().await.unwrap().len(),
        after_shutdown,
        "poll task kept fetching after shutdown"
    );

    // A second shutdown finds nothing to do.
    coordinator.shutdown().await;
}

#[tokio::test]
async fn test_zero_interval_never_spawns_poll_task() {
    let server = MockServer::start().await;
    mount_states(&server, ResponseTemplate::new(200).set_body_json(states_body(5.0))).await;

    let coordinator = Coordinator::new(config_for(&server)).unwrap();
    coordinator.start_polling().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(server.received_requests().await.unwrap().is_empty());
    coordinator.shutdown().await;
}

// ── Hub startup ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_hub_start_publishes_readings() {
    let server = MockServer::start().await;
    mount_states(&server, ResponseTemplate::new(200).set_body_json(states_body(100.0))).await;

    let hub = Hub::new("home", config_for(&server)).unwrap();
    let mut readings_rx = hub.subscribe_readings();

    hub.start().await.unwrap();
    readings_rx.changed().await.unwrap();

    let readings = hub.readings();
    assert!(readings.iter().any(|r| r.key == "bandwidth"));
    assert!(readings.iter().any(|r| r.key == "device_device_1"));

    hub.shutdown().await;
}

#[tokio::test]
async fn test_hub_start_aborts_on_first_fetch_failure() {
    let server = MockServer::start().await;
    mount_states(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({"error": "API key required"})),
    )
    .await;

    let hub = Hub::new("home", config_for(&server)).unwrap();
    let err = hub.start().await.unwrap_err();
    assert!(matches!(
        err,
        netnest_core::CoreError::AuthenticationFailed { .. }
    ));
    assert!(hub.coordinator().snapshot().is_none());

    hub.shutdown().await;
}
