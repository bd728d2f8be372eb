//! Command handlers: CLI args in, hub operations, rendered output out.

pub mod config_cmd;
pub mod devices;
pub mod discovery;
pub mod refresh;
pub mod status;
pub mod update_device;
pub mod util;
pub mod validate;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a hub-bound command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Validate => validate::handle(global).await,
        Command::Status => status::handle(global).await,
        Command::Devices(args) => devices::handle(&args, global).await,
        Command::Discovery => discovery::handle(global).await,
        Command::Refresh(args) => refresh::handle(&args, global).await,
        Command::UpdateDevice(args) => update_device::handle(args, global).await,
        Command::Watch => watch::handle(global).await,
        // Handled before dispatch; no hub connection involved.
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
