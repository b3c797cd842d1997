//! Command implementations.

pub mod check;
pub mod config;
pub mod records;
pub mod synth;

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing::debug;
use zonekit::{Deployment, Stack};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Deployment file given on the command line or through the environment
    pub deployment: Option<PathBuf>,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Deployment file to use, falling back to the default location.
    pub fn deployment_path(&self) -> Result<PathBuf> {
        match &self.deployment {
            Some(path) => Ok(path.clone()),
            None => crate::config::default_deployment_path(),
        }
    }

    /// Load the deployment file.
    pub fn load(&self) -> Result<Deployment> {
        let path = self.deployment_path()?;
        debug!(path = %path.display(), "loading deployment");
        Deployment::load(&path)
            .with_context(|| format!("Failed to load deployment {}", path.display()))
    }

    /// Load the deployment and build its resource graph.
    pub fn stack(&self) -> Result<Stack> {
        let deployment = self.load()?;
        deployment.build().context("Failed to build deployment")
    }
}
