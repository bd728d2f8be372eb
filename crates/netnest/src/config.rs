//! CLI-side configuration glue.
//!
//! The shared types and the credential chain live in `netnest-config`;
//! this module layers the flag-aware resolution on top: `--base-url`,
//! `--api-key`, and `--timeout` override whatever the profile says, and
//! a full set of flags works with no config file at all.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use netnest_core::{DEFAULT_POLL_INTERVAL, HubConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use netnest_config::{
    Config, HubProfile, config_path, load_config_from, save_config_to, store_api_key,
};

/// Config file path: the `--config` flag wins, then the platform default.
pub fn effective_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config honoring the `--config` flag. A missing file is not
/// an error; it loads as an empty config.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&effective_config_path(global))?)
}

/// Resolve the active hub to a ready-to-use `HubConfig`.
///
/// Selection order is `--hub`, then `default_hub`, then the sole
/// configured profile. When nothing is configured, an `--api-key` flag
/// (or `NETNEST_API_KEY`) is enough to run against the default cloud
/// endpoint.
pub fn resolve_hub(global: &GlobalOpts) -> Result<(String, HubConfig), CliError> {
    let cfg = load(global)?;
    match netnest_config::active_hub_name(global.hub.as_deref(), &cfg) {
        Ok(name) => {
            let profile = cfg.hub(&name)?;
            resolve_profile(profile, &name, &cfg, global)
        }
        Err(_) if global.api_key.is_some() => {
            let profile = HubProfile::default();
            resolve_profile(&profile, "default", &cfg, global)
        }
        Err(_) => Err(CliError::NoConfig {
            path: effective_config_path(global).display().to_string(),
        }),
    }
}

/// Resolve every configured hub, in name order, with flag overrides
/// applied to each. An explicit `--hub` narrows the set to one.
pub fn resolve_hub_scope(global: &GlobalOpts) -> Result<Vec<(String, HubConfig)>, CliError> {
    let cfg = load(global)?;
    if global.hub.is_some() || cfg.hubs.is_empty() {
        return Ok(vec![resolve_hub(global)?]);
    }

    let mut names: Vec<&String> = cfg.hubs.keys().collect();
    names.sort();

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let profile = cfg.hub(name)?;
        resolved.push(resolve_profile(profile, name, &cfg, global)?);
    }
    Ok(resolved)
}

/// Translate a profile plus global flags into a `HubConfig`.
pub fn resolve_profile(
    profile: &HubProfile,
    hub_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(String, HubConfig), CliError> {
    let url_str = global.base_url.as_deref().unwrap_or(&profile.base_url);
    let base_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "base-url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let api_key = match global.api_key {
        Some(ref key) => SecretString::from(key.clone()),
        None => netnest_config::resolve_api_key(profile, hub_name)?,
    };

    let timeout_secs = global
        .timeout
        .or(profile.timeout_secs)
        .unwrap_or(cfg.defaults.timeout);

    Ok((
        hub_name.to_owned(),
        HubConfig {
            base_url,
            api_key,
            poll_interval: profile
                .poll_interval_secs
                .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs),
            timeout: Duration::from_secs(timeout_secs),
            auth_policy: profile.auth_policy,
        },
    ))
}
