//! Shared configuration for the netnest CLI.
//!
//! TOML hub profiles, credential resolution (env + keyring + plaintext),
//! and translation to `netnest_core::HubConfig`. The CLI adds flag-aware
//! overrides on top -- core itself never reads config files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netnest_core::{AuthPolicy, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL, HubConfig};

/// Keyring service name for stored hub API keys.
pub const KEYRING_SERVICE: &str = "netnest";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no hub named '{name}' in config")]
    UnknownHub { name: String },

    #[error("no API key configured for hub '{hub}'")]
    NoCredentials { hub: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Hub used when `--hub` is not specified. With exactly one hub
    /// configured this may stay unset.
    pub default_hub: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named hub profiles.
    #[serde(default)]
    pub hubs: HashMap<String, HubProfile>,
}

impl Config {
    /// Look up a hub profile by name.
    pub fn hub(&self, name: &str) -> Result<&HubProfile, ConfigError> {
        self.hubs.get(name).ok_or_else(|| ConfigError::UnknownHub {
            name: name.to_owned(),
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named hub profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HubProfile {
    /// API base URL; the hosted cloud endpoint unless self-hosted.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (plaintext -- prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Polling cadence in seconds. Construction-time only; running
    /// coordinators do not pick up changes.
    pub poll_interval_secs: Option<u64>,

    /// Request timeout override in seconds.
    pub timeout_secs: Option<u64>,

    /// How credential validation classifies non-connection failures.
    #[serde(default)]
    pub auth_policy: AuthPolicy,
}

impl Default for HubProfile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_env: None,
            poll_interval_secs: None,
            timeout_secs: None,
            auth_policy: AuthPolicy::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `NETNEST_CONFIG` wins, then XDG /
/// platform conventions.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("NETNEST_CONFIG") {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "netnest", "netnest").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netnest");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from an explicit file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETNEST_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to an explicit path.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Hub selection ───────────────────────────────────────────────────

/// Resolve the active hub name: explicit choice, then `default_hub`,
/// then the sole configured hub.
pub fn active_hub_name(explicit: Option<&str>, config: &Config) -> Result<String, ConfigError> {
    if let Some(name) = explicit {
        return Ok(name.to_owned());
    }
    if let Some(ref name) = config.default_hub {
        return Ok(name.clone());
    }
    if config.hubs.len() == 1 {
        if let Some(name) = config.hubs.keys().next() {
            return Ok(name.clone());
        }
    }
    Err(ConfigError::Validation {
        field: "hub".into(),
        reason: "no hub selected: pass --hub, set default_hub, or configure exactly one hub"
            .into(),
    })
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API key from the credential chain (no CLI flag step):
/// profile env var, then keyring, then plaintext config.
pub fn resolve_api_key(profile: &HubProfile, hub_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(hub_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        hub: hub_name.into(),
    })
}

/// Store an API key in the system keyring for a hub.
pub fn store_api_key(hub_name: &str, key: &str) -> Result<(), ConfigError> {
    keyring_entry(hub_name)?.set_password(key)?;
    Ok(())
}

fn keyring_entry(hub_name: &str) -> keyring::Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{hub_name}/api-key"))
}

// ── Projection to core config ───────────────────────────────────────

/// Build a `HubConfig` from a profile -- no CLI flag overrides.
///
/// This is the single boundary where config types cross into core types.
pub fn profile_to_hub_config(
    profile: &HubProfile,
    hub_name: &str,
) -> Result<HubConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let api_key = resolve_api_key(profile, hub_name)?;

    Ok(HubConfig {
        base_url,
        api_key,
        poll_interval: profile
            .poll_interval_secs
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs),
        timeout: Duration::from_secs(profile.timeout_secs.unwrap_or_else(default_timeout)),
        auth_policy: profile.auth_policy,
    })
}
