//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Declare DNS zones once, publish them on LiveDNS and Route53
///
/// Reads a deployment file and renders the resource graph handed to the
/// provisioning engine. Nothing is ever sent to a provider.
#[derive(Parser, Debug)]
#[command(name = "zonekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Deployment file (or set ZONEKIT_DEPLOYMENT env var)
    #[arg(short = 'c', long, env = "ZONEKIT_DEPLOYMENT", global = true)]
    pub deployment: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the deployment as a Terraform JSON document
    Synth(SynthArgs),

    /// List the DNS records of each zone
    Records(RecordsArgs),

    /// Build the deployment and report what it declares
    Check,

    /// Show CLI configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Write the document to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Only show records of this zone
    #[arg(short, long)]
    pub zone: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the default deployment file path
    Path,
}
