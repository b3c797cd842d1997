//! `zonekit check` - build the deployment and summarize it.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::Context;
use crate::output::print_structured;

/// Per-zone counts.
#[derive(Debug, Serialize)]
struct ZoneReport {
    zone: String,
    resources: usize,
    records: usize,
}

/// What a deployment declares.
#[derive(Debug, Serialize)]
struct CheckReport {
    stack: String,
    providers: usize,
    resources: usize,
    zones: Vec<ZoneReport>,
}

pub fn execute(ctx: &Context) -> Result<()> {
    let stack = ctx.stack()?;
    let records = stack.records();

    let zones = stack
        .zones()
        .into_iter()
        .map(|zone| ZoneReport {
            resources: stack
                .resources()
                .iter()
                .filter(|r| r.zone.as_deref() == Some(zone.as_str()))
                .count(),
            records: records.iter().filter(|r| r.zone == zone).count(),
            zone,
        })
        .collect();
    let report = CheckReport {
        stack: stack.name().to_string(),
        providers: stack.providers().count(),
        resources: stack.resources().len(),
        zones,
    };

    if print_structured(ctx.output_format, &report)? {
        return Ok(());
    }

    println!(
        "{} {} ({} providers, {} resources)",
        "OK".green().bold(),
        report.stack.bold(),
        report.providers,
        report.resources
    );
    for zone in &report.zones {
        println!(
            "  {:<28} {:>4} resources {:>4} records",
            zone.zone.cyan(),
            zone.resources,
            zone.records
        );
    }
    Ok(())
}
