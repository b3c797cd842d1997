//! `zonekit synth` - render the Terraform JSON document.

use anyhow::{Context as _, Result};
use colored::Colorize;

use super::Context;
use crate::cli::args::SynthArgs;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: &SynthArgs) -> Result<()> {
    let stack = ctx.stack()?;

    if let Some(out) = &args.out {
        let content = stack.to_json_pretty()?;
        std::fs::write(out, content + "\n")
            .with_context(|| format!("Failed to write {}", out.display()))?;
        if ctx.verbose || ctx.output_format == OutputFormat::Pretty {
            eprintln!(
                "{} {} resources written to {}",
                "Synthesized:".green().bold(),
                stack.resources().len(),
                out.display().to_string().cyan()
            );
        }
        return Ok(());
    }

    let document = stack.synth();
    match ctx.output_format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&document)?),
        OutputFormat::Json | OutputFormat::Pretty => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(())
}
