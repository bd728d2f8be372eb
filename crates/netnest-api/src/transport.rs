// Transport configuration for building reqwest::Client instances.
//
// The client rebuilds its session lazily after a close(), so the
// builder settings live here rather than inside the client itself.

use std::time::Duration;

use crate::error::Error;

/// Shared transport configuration for building HTTP sessions.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("netnest/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    ///
    /// Used by [`crate::Client`] to inject the `x-api-key` header on
    /// every request of a session.
    pub fn build_session(&self, headers: reqwest::header::HeaderMap) -> Result<reqwest::Client, Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .build()?;
        Ok(client)
    }
}
