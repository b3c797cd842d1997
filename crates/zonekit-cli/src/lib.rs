//! # zonekit-cli
//!
//! Command-line interface over zonekit deployments.
//!
//! ## Features
//!
//! - **Synthesis**: render a deployment as a Terraform JSON document
//! - **Inspection**: list the DNS records each zone publishes
//! - **Validation**: build a deployment and report what it declares
//! - **Multiple output formats**: pretty, JSON, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
