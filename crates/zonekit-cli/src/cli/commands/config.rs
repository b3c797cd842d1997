//! `zonekit config` - CLI configuration.

use anyhow::Result;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => show_path(ctx),
    }
}

fn show_path(_ctx: &Context) -> Result<()> {
    let path = crate::config::default_deployment_path()?;
    println!("{}", path.display());
    Ok(())
}
