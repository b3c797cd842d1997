//! Deployment file layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use zonekit_core::{ProviderKind, RecordType, Server, Values};

use crate::config::ZoneDefaults;

/// Root of a deployment file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentFile {
    /// Stack name (default: zonekit).
    #[serde(default = "default_name")]
    pub name: String,

    /// Zone-wide defaults.
    pub defaults: ZoneDefaults,

    /// Provider instances, by alias.
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSpec>,

    /// KMS aliases usable to sign Route53 zones, by construct name.
    #[serde(default)]
    pub signing_keys: BTreeMap<String, SigningKeySpec>,

    /// Servers declared inline.
    #[serde(default)]
    pub servers: Vec<Server>,

    /// JSON server array exported by the compute layer, relative to the
    /// deployment file.
    pub servers_file: Option<PathBuf>,

    /// Fan-out groups, built in order.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

/// A provider instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Provider plugin.
    pub kind: ProviderKind,

    /// Remaining keys go to the provider block as is (`region`, ...).
    #[serde(flatten)]
    pub settings: BTreeMap<String, String>,
}

/// KMS alias pointing at an externally created signing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningKeySpec {
    /// AWS provider alias.
    pub provider: String,
    /// Alias name (`alias/dns-cmk`).
    pub alias: String,
    /// Id of the asymmetric key created by the KMS layer.
    pub target_key_id: String,
}

/// Zone backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Gandi LiveDNS
    LiveDns,
    /// AWS Route53
    Route53,
}

/// One member zone of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneSpec {
    /// Backend hosting the zone.
    pub backend: Backend,

    /// Zone name, without trailing dot.
    pub name: String,

    /// Provider alias the zone's resources are bound to.
    pub provider: String,

    /// Generate a key-signing key.
    #[serde(default)]
    pub sign: bool,

    /// Signing key name, required to sign a Route53 zone.
    pub signing_key: Option<String>,

    /// Register the zone's nameservers at a registrar.
    pub registrar: Option<RegistrarSpec>,

    /// IAM users allowed to change records (Route53 only).
    #[serde(default)]
    pub allow_users: Vec<String>,

    /// Export the hosted zone id under this output name (Route53 only).
    pub output_zone_id: Option<String>,
}

/// Registration at the registrar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrarSpec {
    /// Gandi provider alias.
    pub provider: String,

    /// Publish the key-signing key (default: true).
    #[serde(default = "default_dnssec")]
    pub dnssec: bool,
}

/// Zones sharing the same records, and the records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    /// Member zones; the first one is the primary.
    pub zones: Vec<ZoneSpec>,

    /// Web names served by the `web` servers.
    #[serde(default)]
    pub www: Vec<String>,

    /// Fastmail mail hosting, with extra subdomains.
    pub fastmail_mx: Option<Vec<String>>,

    /// Fastmail client service records.
    #[serde(default)]
    pub fastmail_services: bool,

    /// Address records for servers named under the zone.
    #[serde(default)]
    pub servers: bool,

    /// Explicit records.
    #[serde(default)]
    pub records: Vec<RecordSpec>,

    /// Child zones declared in earlier groups.
    #[serde(default)]
    pub delegations: Vec<DelegationSpec>,
}

/// An explicit record, or address records for tagged servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSpec {
    /// Relative name, or `@`.
    pub name: String,

    /// Record type; leave unset with `servers_tag`.
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,

    /// Values, a string or a list.
    #[serde(default)]
    pub values: Values,

    /// Point A/AAAA records at servers carrying this tag.
    pub servers_tag: Option<String>,

    /// TTL in seconds.
    pub ttl: Option<u32>,
}

/// NS (and DS) records delegating `label` to `zone`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelegationSpec {
    /// Label in the parent zone.
    pub label: String,
    /// Child zone name.
    pub zone: String,
}

// Default value functions for serde.
fn default_name() -> String {
    String::from("zonekit")
}

const fn default_dnssec() -> bool {
    true
}
