//! `validate` command: prove the configured credentials work.

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

use super::discovery::{identity_detail, identity_line};

/// Probe both endpoints with the resolved credentials and show the hub
/// identity on success. Failures map straight to exit codes, so this is
/// the scriptable "is my setup right" check.
pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (name, hub_config) = config::resolve_hub(global)?;
    let info = netnest_core::validate(&hub_config).await?;

    if !global.quiet {
        eprintln!("✓ Credentials for hub '{name}' are valid");
    }
    let out = output::render_single(&global.output, &info, identity_detail, identity_line);
    output::print_output(&out, global.quiet);
    Ok(())
}
