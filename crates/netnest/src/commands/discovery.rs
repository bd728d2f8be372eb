//! `discovery` command: hub identity metadata.

use netnest_core::DiscoveryInfo;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

/// Key/value rendering of a hub's identity, `-` for absent fields.
pub(crate) fn identity_detail(info: &DiscoveryInfo) -> String {
    [
        format!("Name:          {}", info.name.as_deref().unwrap_or("-")),
        format!(
            "Manufacturer:  {}",
            info.manufacturer.as_deref().unwrap_or("-")
        ),
        format!("Model:         {}", info.model.as_deref().unwrap_or("-")),
        format!(
            "SW version:    {}",
            info.sw_version.as_deref().unwrap_or("-")
        ),
        format!(
            "HW version:    {}",
            info.hw_version.as_deref().unwrap_or("-")
        ),
        format!(
            "Config URL:    {}",
            info.configuration_url.as_deref().unwrap_or("-")
        ),
    ]
    .join("\n")
}

pub(crate) fn identity_line(info: &DiscoveryInfo) -> String {
    info.name.clone().unwrap_or_else(|| "unknown".to_owned())
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, hub_config) = config::resolve_hub(global)?;
    let info = util::fetch_discovery(hub_config).await?;

    let out = output::render_single(&global.output, &info, identity_detail, identity_line);
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_detail_dashes_absent_fields() {
        let info = DiscoveryInfo {
            name: Some("Home Hub".into()),
            ..DiscoveryInfo::default()
        };
        let detail = identity_detail(&info);
        assert!(detail.contains("Name:          Home Hub"));
        assert!(detail.contains("Model:         -"));
    }
}
