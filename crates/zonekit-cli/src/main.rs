//! zonekit - synthesize DNS zone deployments
//!
//! Loads a deployment file and renders the resource graph for the external
//! plan/apply engine.

use anyhow::Result;

fn main() -> Result<()> {
    zonekit_cli::run()
}
