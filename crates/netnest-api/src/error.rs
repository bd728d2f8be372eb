use thiserror::Error;

/// Top-level error type for the `netnest-api` crate.
///
/// Covers every failure mode of the telemetry endpoints: transport,
/// authentication, non-2xx API responses, and payload decoding.
/// `netnest-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API key rejected by the service (HTTP 401/403).
    #[error("Invalid API key")]
    InvalidApiKey,

    /// API key could not be used at all (e.g. not a valid header value).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response, with the `{"error": …}` envelope message when
    /// the body carried one.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never produced an HTTP response:
    /// DNS failure, refused connection, or timeout.
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport(e) => {
                e.is_connect() || e.is_timeout() || (e.is_request() && e.status().is_none())
            }
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the service explicitly rejected the credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidApiKey | Self::Authentication { .. })
    }

    /// HTTP status of the failing response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::InvalidApiKey => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
