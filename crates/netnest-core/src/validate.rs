// ── Credential validation ──
//
// Setup-time probe of both endpoints on a throwaway client. The hosted
// API is vague about auth failures, so classification of non-connection
// errors is governed by `AuthPolicy` rather than hardcoded.

use tracing::{debug, info};

use netnest_api::{Client, DiscoveryInfo, TransportConfig};

use crate::config::{AuthPolicy, HubConfig};
use crate::error::CoreError;

/// Check that the configured credentials actually work.
///
/// Fetches discovery (identity) and states (telemetry) once each; both
/// must succeed. The probe client is closed on every path. Connection
/// failures pass through as [`CoreError::ConnectionFailed`] /
/// [`CoreError::Timeout`]; anything else is classified per the
/// configured [`AuthPolicy`].
pub async fn validate(config: &HubConfig) -> Result<DiscoveryInfo, CoreError> {
    let transport = TransportConfig {
        timeout: config.timeout,
        ..TransportConfig::default()
    };
    let client = Client::new(config.base_url.as_str(), &config.api_key, transport)?;

    debug!(url = %config.base_url, "validating hub credentials");
    let result = probe(&client).await;
    client.close();

    match result {
        Ok(info) => {
            info!(
                name = info.name.as_deref().unwrap_or("unknown"),
                "credential validation succeeded"
            );
            Ok(info)
        }
        Err(e) => Err(classify(e, config.auth_policy)),
    }
}

/// Both endpoints must answer; the discovery identity is what callers
/// display on success.
async fn probe(client: &Client) -> Result<DiscoveryInfo, netnest_api::Error> {
    let info = client.discovery().await?;
    client.states().await?;
    Ok(info)
}

fn classify(err: netnest_api::Error, policy: AuthPolicy) -> CoreError {
    if err.is_connection() {
        return CoreError::from(err);
    }
    match policy {
        AuthPolicy::Lenient => CoreError::AuthenticationFailed {
            message: err.to_string(),
        },
        AuthPolicy::Strict if err.is_auth() => CoreError::AuthenticationFailed {
            message: err.to_string(),
        },
        AuthPolicy::Strict => CoreError::from(err),
    }
}
