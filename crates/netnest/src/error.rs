//! CLI error types with miette diagnostics.
//!
//! Every failure a command can hit is translated into a [`CliError`]
//! variant carrying a diagnostic code, help text, and a process exit
//! code. Core and config errors are mapped here, at the outermost
//! boundary.

use miette::Diagnostic;
use thiserror::Error;

use netnest_config::ConfigError;
use netnest_core::CoreError;

/// Process exit codes, one per failure class.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot connect to hub at {url}: {reason}")]
    #[diagnostic(
        code(netnest::connection_failed),
        help(
            "Check that the hub API is reachable from this machine.\n\
             URL: {url}\n\
             Try: netnest validate"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(netnest::timeout),
        help("Increase the timeout with --timeout or check hub responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(netnest::auth_failed),
        help(
            "Verify your API key.\n\
             Run: netnest config set-key\n\
             Or set the NETNEST_API_KEY environment variable."
        )
    )]
    AuthFailed { message: String },

    #[error("No API key configured for hub '{hub}'")]
    #[diagnostic(
        code(netnest::no_credentials),
        help(
            "Store a key with: netnest config set-key --hub {hub}\n\
             Or set the NETNEST_API_KEY environment variable."
        )
    )]
    NoCredentials { hub: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netnest::not_found),
        help("Run: netnest {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(netnest::api_error))]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netnest::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No configuration found")]
    #[diagnostic(
        code(netnest::no_config),
        help(
            "Create one with: netnest config init\n\
             Expected at: {path}\n\
             (Or pass --api-key / NETNEST_API_KEY to run without a config file.)"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(netnest::config))]
    Config(Box<ConfigError>),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(netnest::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to its process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Shorthand for a missing resource with a suggested listing command.
    pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.to_owned(),
            identifier: identifier.to_owned(),
            list_command: list_command.to_owned(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::HubNotFound { name } => Self::not_found("hub", &name, "config profiles"),
            CoreError::DeviceNotFound { id } => Self::not_found("device", &id, "devices"),
            CoreError::Api { message, status } => Self::Api { message, status },
            CoreError::Config { message } => Self::Validation {
                field: "request".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Api {
                message,
                status: None,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownHub { name } => Self::not_found("hub", &name, "config profiles"),
            ConfigError::NoCredentials { hub } => Self::NoCredentials { hub },
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_map_by_failure_class() {
        let cases: Vec<(CliError, i32)> = vec![
            (
                CliError::ConnectionFailed {
                    url: "http://h".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CliError::Timeout { seconds: 30 }, exit_code::TIMEOUT),
            (
                CliError::AuthFailed {
                    message: "bad key".into(),
                },
                exit_code::AUTH,
            ),
            (
                CliError::NoCredentials { hub: "home".into() },
                exit_code::AUTH,
            ),
            (
                CliError::not_found("device", "d9", "devices"),
                exit_code::NOT_FOUND,
            ),
            (
                CliError::Validation {
                    field: "request".into(),
                    reason: "empty id".into(),
                },
                exit_code::USAGE,
            ),
            (
                CliError::Api {
                    message: "boom".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "wrong exit code for {err}");
        }
    }

    #[test]
    fn core_errors_translate_to_cli_classes() {
        let err: CliError = CoreError::Timeout { timeout_secs: 10 }.into();
        assert!(matches!(err, CliError::Timeout { seconds: 10 }));

        let err: CliError = CoreError::DeviceNotFound { id: "d1".into() }.into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        // Service-layer request validation surfaces as a usage error.
        let err: CliError = CoreError::Config {
            message: "update-device requires a device id".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn config_errors_translate_to_cli_classes() {
        let err: CliError = ConfigError::UnknownHub {
            name: "garage".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        let err: CliError = ConfigError::NoCredentials { hub: "home".into() }.into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
