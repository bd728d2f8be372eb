//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// netnest -- command-line client for NetworkNest hub telemetry
#[derive(Debug, Parser)]
#[command(
    name = "netnest",
    version,
    about = "Query and watch NetworkNest hub telemetry",
    long_about = "A command-line client for the NetworkNest telemetry API.\n\n\
                  One-shot queries (status, devices, discovery), credential\n\
                  validation, service commands (refresh, update-device), and a\n\
                  live watch mode that polls every configured hub.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

/// Options available to every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Hub profile to use (defaults to `default_hub`, or the sole
    /// configured hub)
    #[arg(long, global = true, env = "NETNEST_HUB", value_name = "NAME")]
    pub hub: Option<String>,

    /// API base URL (overrides the profile)
    #[arg(long, global = true, env = "NETNEST_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// API key (overrides every other credential source)
    #[arg(
        long,
        global = true,
        env = "NETNEST_API_KEY",
        hide_env = true,
        value_name = "KEY"
    )]
    pub api_key: Option<String>,

    /// Path to the config file
    #[arg(long, global = true, env = "NETNEST_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        env = "NETNEST_OUTPUT",
        value_enum,
        default_value_t = OutputFormat::Table
    )]
    pub output: OutputFormat,

    /// Request timeout in seconds (default 30)
    #[arg(long, global = true, env = "NETNEST_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to use colored output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

/// Output rendering format.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
    /// One record per line, for scripting
    Plain,
}

/// Color output behavior.
#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Detect terminal support
    Auto,
    /// Force color on
    Always,
    /// Force color off
    Never,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the configured credentials actually work
    Validate,

    /// Current telemetry readings from the active hub
    #[command(alias = "st")]
    Status,

    /// List devices from the latest snapshot
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Hub identity metadata (model, versions, admin URL)
    Discovery,

    /// Fetch fresh data now instead of waiting for the next poll
    Refresh(RefreshArgs),

    /// Edit a device's cached name or type
    UpdateDevice(UpdateDeviceArgs),

    /// Stream reading changes from configured hubs until Ctrl-C
    #[command(alias = "w")]
    Watch,

    /// Manage CLI configuration and hub profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Show only the device with this id
    #[arg(long, value_name = "ID")]
    pub watch_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Refresh every configured hub, not just the active one
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct UpdateDeviceArgs {
    /// Device id to edit
    #[arg(long, value_name = "ID")]
    pub id: String,

    /// New display name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// New device type label
    #[arg(long = "type", value_name = "TYPE")]
    pub device_type: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// List configured hub profiles
    Profiles,

    /// Set the default hub
    Use {
        /// Hub name to set as default
        name: String,
    },

    /// Store an API key in the system keyring
    SetKey {
        /// Hub to store the key for (defaults to the active hub)
        #[arg(long, value_name = "NAME")]
        hub: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
