// ── Runtime hub configuration ──
//
// These types describe *how* to reach a NetworkNest hub.
// They carry credential data and polling tuning, but never touch disk.
// The CLI constructs a `HubConfig` from profile data and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default cloud endpoint for the hosted NetworkNest API.
pub const DEFAULT_BASE_URL: &str = "https://jwqmtmapnvncrwixouek.supabase.co";

/// Default polling cadence. Fixed at construction; there is no runtime
/// interval override.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// How credential validation classifies non-connection failures.
///
/// The hosted API reports auth failures inconsistently, so the default
/// treats every non-transport error during validation as an auth
/// problem. `Strict` narrows that to HTTP 401/403 and lets everything
/// else surface as what it actually was.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Configuration for one NetworkNest hub connection.
///
/// Built by the CLI from a config profile, passed to `Coordinator` --
/// core never reads config files.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// API base URL (the `/functions/v1/` prefix is appended per request).
    pub base_url: Url,
    /// API key sent as the `x-api-key` header.
    pub api_key: SecretString,
    /// How often the coordinator polls the states endpoint.
    pub poll_interval: Duration,
    /// Request timeout.
    pub timeout: Duration,
    /// Validation classification policy.
    pub auth_policy: AuthPolicy,
}

impl HubConfig {
    /// Build a config for the given key against the hosted cloud endpoint,
    /// with default polling and timeout values.
    pub fn for_key(api_key: SecretString) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should be valid"),
            api_key,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: Duration::from_secs(30),
            auth_policy: AuthPolicy::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_parses() {
        let cfg = HubConfig::for_key(SecretString::from("k".to_string()));
        assert_eq!(cfg.base_url.host_str().unwrap(), "jwqmtmapnvncrwixouek.supabase.co");
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.auth_policy, AuthPolicy::Lenient);
    }

    #[test]
    fn auth_policy_round_trips_through_serde() {
        let strict: AuthPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(strict, AuthPolicy::Strict);
        assert_eq!(serde_json::to_string(&AuthPolicy::Lenient).unwrap(), "\"lenient\"");
    }
}
