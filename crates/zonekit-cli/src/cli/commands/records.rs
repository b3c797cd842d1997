//! `zonekit records` - list the records each zone publishes.

use anyhow::Result;
use colored::Colorize;
use zonekit::PublishedRecord;

use super::Context;
use crate::cli::args::RecordsArgs;
use crate::output::print_structured;

pub fn execute(ctx: &Context, args: &RecordsArgs) -> Result<()> {
    let stack = ctx.stack()?;
    let records: Vec<PublishedRecord> = stack
        .records()
        .into_iter()
        .filter(|r| args.zone.as_ref().map_or(true, |zone| &r.zone == zone))
        .collect();

    if let Some(zone) = &args.zone {
        if records.is_empty() && !stack.zones().contains(zone) {
            anyhow::bail!("Unknown zone: {zone}");
        }
    }

    if print_structured(ctx.output_format, &records)? {
        return Ok(());
    }

    let mut current: Option<&str> = None;
    for record in &records {
        if current != Some(record.zone.as_str()) {
            if current.is_some() {
                println!();
            }
            println!("{}", record.zone.bold().underline());
            current = Some(record.zone.as_str());
        }
        print_record(record);
    }

    if records.is_empty() {
        println!("{}", "No records.".dimmed());
    }
    Ok(())
}

fn print_record(record: &PublishedRecord) {
    let routing = record
        .set_identifier
        .as_deref()
        .map(|id| format!(" [{id}]").dimmed().to_string())
        .unwrap_or_default();
    println!(
        "  {:<24} {:>6} {:<6} {}{}",
        record.name.cyan(),
        record.ttl,
        record.record_type.to_string().yellow(),
        record.values.join(" "),
        routing
    );
}
