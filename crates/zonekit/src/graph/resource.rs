//! Declared resources and their logical identifiers.

use ring::digest::{digest, SHA256};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use zonekit_core::{AttrRef, Provider, ProviderKind, RecordType, Result, ZoneError};

/// Number of hex digits of the path digest appended to logical ids.
const ID_HASH_LEN: usize = 8;

/// Resource and data-source types the graph can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// LiveDNS record set
    GandiLivednsRecord,
    /// LiveDNS key-signing key
    GandiLivednsKey,
    /// LiveDNS nameservers of a domain (data source)
    GandiLivednsDomainNs,
    /// Nameservers registered at the registrar
    GandiNameservers,
    /// DNSSEC key registered at the registrar
    GandiDnssecKey,
    /// Route53 hosted zone
    AwsRoute53Zone,
    /// Route53 record set
    AwsRoute53Record,
    /// Route53 key-signing key
    AwsRoute53KeySigningKey,
    /// Route53 DNSSEC signing switch
    AwsRoute53HostedZoneDnssec,
    /// KMS key alias
    AwsKmsAlias,
    /// IAM user
    AwsIamUser,
    /// Inline IAM user policy
    AwsIamUserPolicy,
}

impl ResourceKind {
    /// Terraform type name.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::GandiLivednsRecord => "gandi_livedns_record",
            Self::GandiLivednsKey => "gandi_livedns_key",
            Self::GandiLivednsDomainNs => "gandi_livedns_domain_ns",
            Self::GandiNameservers => "gandi_nameservers",
            Self::GandiDnssecKey => "gandi_dnssec_key",
            Self::AwsRoute53Zone => "aws_route53_zone",
            Self::AwsRoute53Record => "aws_route53_record",
            Self::AwsRoute53KeySigningKey => "aws_route53_key_signing_key",
            Self::AwsRoute53HostedZoneDnssec => "aws_route53_hosted_zone_dnssec",
            Self::AwsKmsAlias => "aws_kms_alias",
            Self::AwsIamUser => "aws_iam_user",
            Self::AwsIamUserPolicy => "aws_iam_user_policy",
        }
    }

    /// Returns true for read-only data sources.
    #[must_use]
    pub const fn is_data(self) -> bool {
        matches!(self, Self::GandiLivednsDomainNs)
    }

    /// Provider plugin managing this kind.
    #[must_use]
    pub const fn provider_kind(self) -> ProviderKind {
        match self {
            Self::GandiLivednsRecord
            | Self::GandiLivednsKey
            | Self::GandiLivednsDomainNs
            | Self::GandiNameservers
            | Self::GandiDnssecKey => ProviderKind::Gandi,
            _ => ProviderKind::Aws,
        }
    }

    /// Returns true for DNS record sets.
    #[must_use]
    pub const fn is_record(self) -> bool {
        matches!(self, Self::GandiLivednsRecord | Self::AwsRoute53Record)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Build the logical id for a construct path.
///
/// Characters outside `[A-Za-z0-9_-]` become `_`, then the first hex digits
/// of the path's SHA-256 keep ids unique when sanitizing collapses paths
/// (`TXT-@` and `TXT-*`).
#[must_use]
pub fn logical_id(path: &str) -> String {
    let mut id: String = path
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if id.chars().next().map_or(true, |c| c.is_ascii_digit() || c == '-') {
        id.insert(0, '_');
    }
    let hash = digest(&SHA256, path.as_bytes());
    format!("{id}_{}", &hex::encode(hash.as_ref())[..ID_HASH_LEN])
}

/// A declared resource or data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Resource type
    pub kind: ResourceKind,
    /// Construct path, unique within a stack (`G-luffy.cx/TXT-@`)
    pub path: String,
    /// Provider reference (`gandi.vb`)
    pub provider: String,
    /// Zone the resource was declared by, if any
    pub zone: Option<String>,
    /// Resource arguments
    pub attributes: Map<String, Value>,
    /// Addresses this resource must wait for
    pub depends_on: Vec<String>,
}

impl Resource {
    /// Declare a resource bound to `provider`.
    ///
    /// Fails if the provider plugin does not manage `kind`.
    pub fn new(kind: ResourceKind, path: impl Into<String>, provider: &Provider) -> Result<Self> {
        provider.expect(kind.provider_kind())?;
        Ok(Self {
            kind,
            path: path.into(),
            provider: provider.reference(),
            zone: None,
            attributes: Map::new(),
            depends_on: Vec::new(),
        })
    }

    /// Record the declaring zone.
    #[must_use]
    pub fn in_zone(mut self, zone: &str) -> Self {
        self.zone = Some(zone.to_string());
        self
    }

    /// Set an argument.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Add an explicit dependency.
    #[must_use]
    pub fn depends_on(mut self, other: &Self) -> Self {
        self.depends_on.push(other.address());
        self
    }

    /// Logical id derived from the path.
    #[must_use]
    pub fn logical_id(&self) -> String {
        logical_id(&self.path)
    }

    /// Address used in references (`data.` prefixed for data sources).
    #[must_use]
    pub fn address(&self) -> String {
        let address = format!("{}.{}", self.kind.type_name(), self.logical_id());
        if self.kind.is_data() {
            format!("data.{address}")
        } else {
            address
        }
    }

    /// Reference one of the attributes computed by the provisioning engine.
    #[must_use]
    pub fn reference(&self, attribute: &str) -> AttrRef {
        AttrRef::new(self.address(), attribute)
    }

    /// String argument, if set.
    #[must_use]
    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

/// Resources declared by one zone or stack, unique by path.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    resources: Vec<Resource>,
    paths: HashSet<String>,
}

impl ResourceSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource, failing on a path already declared.
    pub fn push(&mut self, resource: Resource) -> Result<&Resource> {
        if !self.paths.insert(resource.path.clone()) {
            return Err(ZoneError::DuplicateResource {
                path: resource.path,
            });
        }
        self.resources.push(resource);
        Ok(&self.resources[self.resources.len() - 1])
    }

    /// Number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Resources of one kind, in declaration order.
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Find a resource by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.path == path)
    }

    /// DNS records declared so far, in declaration order.
    pub fn records(&self) -> impl Iterator<Item = PublishedRecord> + '_ {
        self.resources.iter().filter_map(PublishedRecord::from_resource)
    }

    /// Move every resource out, leaving the set empty.
    #[must_use]
    pub fn take(&mut self) -> Vec<Resource> {
        self.paths.clear();
        std::mem::take(&mut self.resources)
    }
}

impl IntoIterator for ResourceSet {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

/// Uniform view of a record resource, whatever the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedRecord {
    /// Zone the record belongs to
    pub zone: String,
    /// Name as sent to the backend
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Values as sent to the backend
    pub values: Vec<String>,
    /// TTL in seconds
    pub ttl: u32,
    /// Routing set identifier, if routed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
}

impl PublishedRecord {
    /// Read a record back from a record resource.
    #[must_use]
    pub fn from_resource(resource: &Resource) -> Option<Self> {
        let values_key = match resource.kind {
            ResourceKind::GandiLivednsRecord => "values",
            ResourceKind::AwsRoute53Record => "records",
            _ => return None,
        };
        // A list expression is kept as its single element.
        let values = match resource.attributes.get(values_key)? {
            Value::Array(values) => values
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            Value::String(expr) => vec![expr.clone()],
            _ => return None,
        };
        Some(Self {
            zone: resource.zone.clone()?,
            name: resource.str_attr("name")?.to_string(),
            record_type: resource.str_attr("type")?.parse().ok()?,
            values,
            ttl: u32::try_from(resource.attributes.get("ttl")?.as_u64()?).ok()?,
            set_identifier: resource.str_attr("set_identifier").map(String::from),
        })
    }
}
