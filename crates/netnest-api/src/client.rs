// Hand-crafted async HTTP client for the NetworkNest cloud API.
//
// Base path: /functions/v1/
// Auth: x-api-key header

use std::sync::{Mutex, PoisonError};

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{DiscoveryInfo, StatesPayload};

/// Hub identity and entity manifest endpoint.
pub const DISCOVERY_ENDPOINT: &str = "homeassistant-discovery";
/// Live telemetry endpoint polled by the coordinator.
pub const STATES_ENDPOINT: &str = "homeassistant-states";

// ── Error response shape from the cloud functions ────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the NetworkNest telemetry endpoints.
///
/// The underlying HTTP session is created lazily on first use and shared
/// across calls. [`Client::close`] releases it; it is safe to call close
/// repeatedly (or before any request), and a later fetch simply builds a
/// fresh session.
pub struct Client {
    base_url: Url,
    headers: HeaderMap,
    transport: TransportConfig,
    session: Mutex<Option<reqwest::Client>>,
}

impl Client {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, API key, and transport config.
    ///
    /// Injects `x-api-key` as a sensitive default header on every
    /// request. Trailing slashes on the base URL are ignored.
    pub fn new(
        base_url: &str,
        api_key: &secrecy::SecretString,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("x-api-key", key_value);

        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            base_url,
            headers,
            transport,
            session: Mutex::new(None),
        })
    }

    /// Build the base URL with the `/functions/v1/` suffix in place.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/functions/v1/"));
        Ok(url)
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Get the cached HTTP session, building one if none exists.
    fn session(&self) -> Result<reqwest::Client, Error> {
        let mut guard = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(http) = guard.as_ref() {
            return Ok(http.clone());
        }
        let http = self.transport.build_session(self.headers.clone())?;
        *guard = Some(http.clone());
        Ok(http)
    }

    /// Release the underlying HTTP session.
    ///
    /// Idempotent: closing an already-closed (or never-opened) client is
    /// a no-op, and each built session is released exactly once.
    pub fn close(&self) {
        let mut guard = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("HTTP session released");
        }
    }

    /// Whether a session is currently live.
    pub fn is_open(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an endpoint name (e.g. `"homeassistant-states"`) onto the base.
    fn url(&self, endpoint: &str) -> Url {
        // base_url always ends with `/functions/v1/`, so joining works.
        self.base_url
            .join(endpoint)
            .expect("endpoint should be a valid relative URL")
    }

    // ── HTTP ─────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        let url = self.url(endpoint);
        debug!("GET {url}");

        let http = self.session()?;
        let resp = http.get(url).send().await.map_err(|e| self.send_error(e))?;
        self.handle_response(resp).await
    }

    /// Map a send-phase error, substituting the configured timeout where
    /// reqwest only reports "operation timed out".
    fn send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.transport.timeout.as_secs(),
            }
        } else {
            Error::Transport(e)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::InvalidApiKey;
        }

        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse { error: Some(msg) }) => Error::Api {
                status: status.as_u16(),
                message: msg,
            },
            _ => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// GET an arbitrary endpoint and return the raw JSON value.
    pub async fn fetch(&self, endpoint: &str) -> Result<serde_json::Value, Error> {
        self.get(endpoint).await
    }

    /// Fetch the hub identity / entity manifest.
    pub async fn discovery(&self) -> Result<DiscoveryInfo, Error> {
        self.get(DISCOVERY_ENDPOINT).await
    }

    /// Fetch the current telemetry snapshot.
    pub async fn states(&self) -> Result<StatesPayload, Error> {
        self.get(STATES_ENDPOINT).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
