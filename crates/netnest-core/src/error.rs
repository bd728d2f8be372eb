// ── Core error types ──
//
// User-facing errors from netnest-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<netnest_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to hub at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Hub request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Hub not found: {name}")]
    HubNotFound { name: String },

    #[error("Device not found: {id}")]
    DeviceNotFound { id: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error came from the transport layer (DNS, refused
    /// connection, timeout) rather than from the API or the caller.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            CoreError::ConnectionFailed { .. } | CoreError::Timeout { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netnest_api::Error> for CoreError {
    fn from(err: netnest_api::Error) -> Self {
        match err {
            netnest_api::Error::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key".into(),
            },
            netnest_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            netnest_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            netnest_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            netnest_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            netnest_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            netnest_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
