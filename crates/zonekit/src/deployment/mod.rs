//! Declarative deployments.
//!
//! A deployment file names the providers, the servers and the fan-out
//! groups of a stack; [`Deployment::build`] replays it against the zone
//! protocol exactly as hand-written code would: open and sign each zone,
//! register it, apply the group's bundles through a [`MultiZone`], then
//! collect every resource into a [`Stack`].

mod schema;

pub use schema::{
    Backend, DelegationSpec, DeploymentFile, GroupSpec, ProviderSpec, RecordSpec, RegistrarSpec,
    SigningKeySpec, ZoneSpec,
};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zonekit_core::{
    tagged, Provider, RecordOptions, Result, Server, SigningKeyHandle, ZoneError, ZoneSummary,
};

use crate::config::ZoneDefaults;
use crate::graph::Stack;
use crate::zone::livedns::LiveDnsZone;
use crate::zone::multi::MultiZone;
use crate::zone::route53::Route53Zone;
use crate::zone::signing::{HostedZone, SigningState};
use crate::zone::{Zone, ZoneExt};

/// A parsed deployment file.
#[derive(Debug, Clone)]
pub struct Deployment {
    file: DeploymentFile,
    base_dir: PathBuf,
}

impl Deployment {
    /// Load a deployment from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let base_dir = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        let deployment = Self::from_toml_str(&content)?.with_base_dir(base_dir);
        debug!(path = %path.display(), groups = deployment.file.groups.len(), "loaded deployment");
        Ok(deployment)
    }

    /// Parse a deployment; relative paths resolve from the current directory.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file = toml::from_str(content).map_err(|e| ZoneError::Deployment(e.to_string()))?;
        Ok(Self {
            file,
            base_dir: PathBuf::new(),
        })
    }

    /// Resolve relative paths from `base_dir`.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// The parsed file.
    #[must_use]
    pub const fn file(&self) -> &DeploymentFile {
        &self.file
    }

    /// Inline servers followed by those of `servers_file`.
    pub fn servers(&self) -> Result<Vec<Server>> {
        let mut servers = self.file.servers.clone();
        if let Some(path) = &self.file.servers_file {
            let path = self.base_dir.join(path);
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ZoneError::Deployment(format!("cannot read {}: {e}", path.display()))
            })?;
            let exported: Vec<Server> = serde_json::from_str(&content)?;
            servers.extend(exported);
        }
        Ok(servers)
    }

    /// Build the resource graph.
    pub fn build(&self) -> Result<Stack> {
        let servers = self.servers()?;
        let mut stack = Stack::new(&self.file.name);
        for (alias, spec) in &self.file.providers {
            stack.add_provider(Provider {
                kind: spec.kind,
                alias: alias.clone(),
                settings: spec.settings.clone(),
            })?;
        }

        let mut keys = BTreeMap::new();
        for (name, spec) in &self.file.signing_keys {
            let provider = stack.provider(&spec.provider)?.clone();
            let handle = stack.kms_alias(name, &spec.alias, &spec.target_key_id, &provider)?;
            keys.insert(name.as_str(), handle);
        }

        // Only zones delegated to need a summary (and, on LiveDNS, a lookup).
        let delegated: HashSet<&str> = self
            .file
            .groups
            .iter()
            .flat_map(|g| &g.delegations)
            .map(|d| d.zone.as_str())
            .collect();
        let mut summaries: HashMap<String, ZoneSummary> = HashMap::new();

        for group in &self.file.groups {
            let mut zones = group
                .zones
                .iter()
                .map(|spec| open_zone(&mut stack, &self.file.defaults, &keys, spec))
                .collect::<Result<Vec<_>>>()?;

            let mut fan_out = MultiZone::new(zones.iter_mut().map(|z| &mut **z).collect())?;
            apply_group(&mut fan_out, group, &servers, &summaries)?;
            debug!(zones = ?fan_out.names(), "applied group");

            for zone in &mut zones {
                let name = zone.name().to_string();
                if delegated.contains(name.as_str()) && !summaries.contains_key(&name) {
                    let summary = zone.summary()?;
                    summaries.insert(name, summary);
                }
                stack.absorb(zone.take_resources())?;
            }
        }

        info!(
            stack = %stack.name(),
            groups = self.file.groups.len(),
            resources = stack.resources().len(),
            "built deployment"
        );
        Ok(stack)
    }
}

/// Open, sign, grant and register one zone.
fn open_zone(
    stack: &mut Stack,
    defaults: &ZoneDefaults,
    keys: &BTreeMap<&str, SigningKeyHandle>,
    spec: &ZoneSpec,
) -> Result<Box<dyn HostedZone>> {
    let provider = stack.provider(&spec.provider)?.clone();
    let defaults = defaults.clone();
    let mut zone: Box<dyn HostedZone> = match spec.backend {
        Backend::LiveDns => {
            if spec.signing_key.is_some()
                || !spec.allow_users.is_empty()
                || spec.output_zone_id.is_some()
            {
                return Err(ZoneError::Deployment(format!(
                    "{}: signing_key, allow_users and output_zone_id need a route53 zone",
                    spec.name
                )));
            }
            let zone = LiveDnsZone::new(&spec.name, &provider, defaults)?;
            if spec.sign {
                Box::new(zone.sign()?)
            } else {
                Box::new(zone)
            }
        }
        Backend::Route53 => {
            let zone = Route53Zone::new(&spec.name, &provider, defaults)?;
            if spec.sign {
                let key_name = spec.signing_key.as_deref().ok_or_else(|| {
                    ZoneError::Deployment(format!(
                        "{}: signing a route53 zone needs a signing_key",
                        spec.name
                    ))
                })?;
                let handle = keys.get(key_name).ok_or_else(|| {
                    ZoneError::Deployment(format!("{}: unknown signing key {key_name}", spec.name))
                })?;
                finish_route53(stack, spec, zone.sign(handle)?)?
            } else {
                finish_route53(stack, spec, zone)?
            }
        }
    };

    if let Some(registrar) = &spec.registrar {
        let registrar_provider = stack.provider(&registrar.provider)?;
        zone.register(registrar_provider, registrar.dnssec)?;
    }
    Ok(zone)
}

/// Route53-only settings, applied while the zone type is still known.
fn finish_route53<S>(
    stack: &mut Stack,
    spec: &ZoneSpec,
    mut zone: Route53Zone<S>,
) -> Result<Box<dyn HostedZone>>
where
    S: SigningState + 'static,
{
    for user in &spec.allow_users {
        zone.allow_user(user)?;
    }
    if let Some(output) = &spec.output_zone_id {
        stack.output(output, zone.zone_id().interpolate())?;
    }
    Ok(Box::new(zone))
}

/// Apply a group's bundles and records through its fan-out.
fn apply_group<Z: Zone + ?Sized>(
    zone: &mut Z,
    group: &GroupSpec,
    servers: &[Server],
    summaries: &HashMap<String, ZoneSummary>,
) -> Result<()> {
    for name in &group.www {
        zone.www(name, servers)?;
    }
    if let Some(subdomains) = &group.fastmail_mx {
        let subdomains: Vec<&str> = subdomains.iter().map(String::as_str).collect();
        zone.fastmail_mx(&subdomains)?;
    }
    if group.fastmail_services {
        zone.fastmail_services()?;
    }
    if group.servers {
        zone.servers(servers)?;
    }
    for record in &group.records {
        apply_record(zone, record, servers)?;
    }
    for delegation in &group.delegations {
        let summary = summaries.get(&delegation.zone).ok_or_else(|| {
            ZoneError::Deployment(format!(
                "cannot delegate {} to {}: zone not declared in an earlier group",
                delegation.label, delegation.zone
            ))
        })?;
        zone.delegate(&delegation.label, summary)?;
    }
    Ok(())
}

fn apply_record<Z: Zone + ?Sized>(zone: &mut Z, spec: &RecordSpec, servers: &[Server]) -> Result<()> {
    let options = RecordOptions {
        ttl: spec.ttl,
        routing: None,
    };
    match (&spec.servers_tag, spec.record_type) {
        (Some(tag), None) => {
            zone.a_aaaa(&spec.name, tagged(servers, tag), options)?;
        }
        (None, Some(record_type)) => {
            zone.rr(&spec.name, record_type, spec.values.clone(), options)?;
        }
        _ => {
            return Err(ZoneError::Deployment(format!(
                "record {}: set exactly one of type and servers_tag",
                spec.name
            )));
        }
    }
    Ok(())
}
