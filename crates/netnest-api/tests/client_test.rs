#![allow(clippy::unwrap_used)]
// Integration tests for `Client` using wiremock.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netnest_api::{Client, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let key: secrecy::SecretString = "test-key".to_owned().into();
    let client = Client::new(&server.uri(), &key, TransportConfig::default()).unwrap();
    (server, client)
}

fn states_body() -> serde_json::Value {
    json!({
        "bandwidth": 85.3,
        "bandwidth_down": 68.2,
        "bandwidth_up": 17.1,
        "connected_devices": 5,
        "devices": [
            {
                "id": "device_1",
                "name": "Living Room TV",
                "type": "Smart TV",
                "ip": "192.168.1.100",
                "status": "online",
                "bandwidth": "23.5 MB/s"
            },
            {
                "id": "device_2",
                "status": "offline"
            }
        ],
        "network_status": "online",
        "uptime": 168.5,
        "last_updated": "2024-06-15T10:30:00Z"
    })
}

// ── States endpoint ─────────────────────────────────────────────────

#[tokio::test]
async fn test_states_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/homeassistant-states"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(states_body()))
        .mount(&server)
        .await;

    let states = client.states().await.unwrap();

    assert_eq!(states.bandwidth, Some(85.3));
    assert_eq!(states.connected_devices, Some(5));
    assert_eq!(states.network_status.as_deref(), Some("online"));
    assert_eq!(states.uptime, Some(168.5));
    assert_eq!(states.devices.len(), 2);
    assert_eq!(states.devices[0].id, "device_1");
    assert_eq!(states.devices[0].device_type.as_deref(), Some("Smart TV"));
    assert_eq!(states.devices[1].name, None);
    assert!(states.last_updated.is_some());
}

#[tokio::test]
async fn test_states_missing_scalars_stay_absent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/homeassistant-states"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "network_status": "online" })),
        )
        .mount(&server)
        .await;

    let states = client.states().await.unwrap();

    assert_eq!(states.bandwidth, None);
    assert_eq!(states.connected_devices, None);
    assert_eq!(states.uptime, None);
    assert!(states.devices.is_empty());
}

#[tokio::test]
async fn test_states_preserves_unknown_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/homeassistant-states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bandwidth": 10.0,
            "firmware_channel": "beta"
        })))
        .mount(&server)
        .await;

    let states = client.states().await.unwrap();

    assert_eq!(
        states.extra.get("firmware_channel").and_then(|v| v.as_str()),
        Some("beta")
    );
}

// ── Discovery endpoint ──────────────────────────────────────────────

#[tokio::test]
async fn test_discovery_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/homeassistant-discovery"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "manufacturer": "NetworkNest",
            "model": "Network Dashboard",
            "name": "NetworkNest Hub",
            "sw_version": "1.0.0",
            "hw_version": "1.0",
            "identifiers": [["networknest", "hub"]]
        })))
        .mount(&server)
        .await;

    let info = client.discovery().await.unwrap();

    assert_eq!(info.manufacturer.as_deref(), Some("NetworkNest"));
    assert_eq!(info.name.as_deref(), Some("NetworkNest Hub"));
    assert_eq!(info.sw_version.as_deref(), Some("1.0.0"));
    assert!(info.extra.contains_key("identifiers"));
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_is_invalid_api_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let result = client.states().await;

    assert!(
        matches!(result, Err(Error::InvalidApiKey)),
        "expected InvalidApiKey, got: {result:?}"
    );
    assert!(result.unwrap_err().is_auth());
}

#[tokio::test]
async fn test_forbidden_is_invalid_api_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.states().await;

    assert!(matches!(result, Err(Error::InvalidApiKey)));
}

#[tokio::test]
async fn test_error_envelope_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "database unavailable" })),
        )
        .mount(&server)
        .await;

    let result = client.states().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_plain_body_falls_back_to_raw() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = client.states().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("upstream down"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_deserialization_error_includes_preview() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.states().await;

    match result {
        Err(Error::Deserialization { ref message, ref body }) => {
            assert!(message.contains("body preview"));
            assert!(body.contains("<html>"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_refused_connection_is_connection_error() {
    // Port 1 is reserved and nothing listens on it.
    let key: secrecy::SecretString = "test-key".to_owned().into();
    let client = Client::new("http://127.0.0.1:1", &key, TransportConfig::default()).unwrap();

    let result = client.states().await;

    let err = result.unwrap_err();
    assert!(err.is_connection(), "expected connection error, got: {err:?}");
    assert!(!err.is_auth());
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn test_session_is_reused_across_calls() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/homeassistant-states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(states_body()))
        .expect(2)
        .mount(&server)
        .await;

    assert!(!client.is_open());
    client.states().await.unwrap();
    assert!(client.is_open());
    client.states().await.unwrap();
    assert!(client.is_open());
}

#[tokio::test]
async fn test_close_twice_is_safe() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/homeassistant-states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(states_body()))
        .mount(&server)
        .await;

    client.states().await.unwrap();
    assert!(client.is_open());

    client.close();
    assert!(!client.is_open());
    client.close();
    assert!(!client.is_open());
}

#[tokio::test]
async fn test_fetch_after_close_rebuilds_session() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/homeassistant-states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(states_body()))
        .expect(2)
        .mount(&server)
        .await;

    client.states().await.unwrap();
    client.close();

    let states = client.states().await.unwrap();
    assert_eq!(states.bandwidth, Some(85.3));
    assert!(client.is_open());
}
