//! `config` subcommands: init wizard, show, profiles, use, set-key.
//!
//! These never open a hub connection. Prompts go to stderr so that
//! redirected stdout stays parseable.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use netnest_core::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, HubProfile};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer to store the API key in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(key)` if the user chose plaintext, `None` if stored in
/// the keyring.
fn prompt_key_storage(hub_name: &str, key: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API key?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_api_key(hub_name, key)?;
        eprintln!("   ✓ API key stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(key.to_owned()))
    }
}

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::effective_config_path(global);
            eprintln!("netnest configuration wizard");
            eprintln!("Config path: {}\n", path.display());

            let hub_name: String = Input::new()
                .with_prompt("Hub name")
                .default("home".into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("API base URL")
                .default(DEFAULT_BASE_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }

            let plaintext_key = prompt_key_storage(&hub_name, &key)?;

            let poll: String = Input::new()
                .with_prompt("Poll interval in seconds (0 disables polling)")
                .default("30".into())
                .interact_text()
                .map_err(prompt_err)?;
            let poll_interval_secs: u64 = poll.parse().map_err(|_| CliError::Validation {
                field: "poll_interval".into(),
                reason: format!("not a number: {poll}"),
            })?;

            let mut cfg = Config {
                default_hub: Some(hub_name.clone()),
                ..Config::default()
            };
            cfg.hubs.insert(
                hub_name.clone(),
                HubProfile {
                    base_url,
                    api_key: plaintext_key,
                    poll_interval_secs: Some(poll_interval_secs),
                    ..HubProfile::default()
                },
            );
            config::save_config_to(&cfg, &path)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Default hub: {hub_name}");
            eprintln!("\n  Test it: netnest validate");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                format_config_redacted,
                |c| c.default_hub.clone().unwrap_or_else(|| "-".to_owned()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            if cfg.hubs.is_empty() {
                eprintln!("No hubs configured. Run: netnest config init");
                return Ok(());
            }
            let default = cfg.default_hub.clone().unwrap_or_default();
            let mut names: Vec<&String> = cfg.hubs.keys().collect();
            names.sort();
            for name in names {
                let marker = if name.as_str() == default { " *" } else { "" };
                println!("{name}{marker}");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;
            if !cfg.hubs.contains_key(&name) {
                return Err(CliError::not_found("hub", &name, "config profiles"));
            }
            cfg.default_hub = Some(name.clone());
            config::save_config_to(&cfg, &config::effective_config_path(global))?;
            if !global.quiet {
                eprintln!("✓ Default hub set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetKey { hub } => {
            let cfg = config::load(global)?;
            let hub_name = match hub {
                Some(name) => name,
                None => netnest_config::active_hub_name(global.hub.as_deref(), &cfg)?,
            };
            // The profile must exist; a key for an unknown hub would
            // never be used.
            cfg.hub(&hub_name)?;

            let key = rpassword::prompt_password("API key: ").map_err(prompt_err)?;
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }
            config::store_api_key(&hub_name, &key)?;
            if !global.quiet {
                eprintln!("✓ API key stored in system keyring for hub '{hub_name}'");
            }
            Ok(())
        }
    }
}

/// Table rendering of the config with secrets masked. The structured
/// formats serialize the real values; masking is for eyeballs, not
/// machines.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();
    if let Some(ref default) = cfg.default_hub {
        let _ = writeln!(out, "default_hub = \"{default}\"");
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<&String> = cfg.hubs.keys().collect();
    names.sort();
    for name in names {
        let profile = &cfg.hubs[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[hubs.{name}]");
        let _ = writeln!(out, "base_url = \"{}\"", profile.base_url);
        if profile.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = profile.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if let Some(secs) = profile.poll_interval_secs {
            let _ = writeln!(out, "poll_interval_secs = {secs}");
        }
        if let Some(secs) = profile.timeout_secs {
            let _ = writeln!(out, "timeout_secs = {secs}");
        }
        let _ = writeln!(out, "auth_policy = \"{}\"", profile.auth_policy);
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_config_masks_plaintext_keys() {
        let mut cfg = Config {
            default_hub: Some("home".into()),
            ..Config::default()
        };
        cfg.hubs.insert(
            "home".into(),
            HubProfile {
                api_key: Some("super-secret".into()),
                poll_interval_secs: Some(60),
                ..HubProfile::default()
            },
        );

        let text = format_config_redacted(&cfg);
        assert!(text.contains("api_key = \"****\""));
        assert!(!text.contains("super-secret"));
        assert!(text.contains("[hubs.home]"));
        assert!(text.contains("poll_interval_secs = 60"));
    }

    #[test]
    fn redacted_config_omits_absent_key_fields() {
        let mut cfg = Config::default();
        cfg.hubs.insert("office".into(), HubProfile::default());

        let text = format_config_redacted(&cfg);
        assert!(!text.contains("api_key"));
        assert!(text.contains("auth_policy = \"lenient\""));
    }
}
