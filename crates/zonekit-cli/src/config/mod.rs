//! Where the CLI looks for things when not told.

use anyhow::Result;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Default deployment file: `zonekit/deployment.toml` in the platform
/// configuration directory.
pub fn default_deployment_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("cx", "luffy", "zonekit")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(dirs.config_dir().join("deployment.toml"))
}
