//! Gandi LiveDNS backend.
//!
//! Records keep their bare relative name (LiveDNS qualifies them itself),
//! TXT values are wrapped in double quotes and every record gets a TTL.
//! There is no routing capability: a record carrying a routing selector is
//! refused.

use tracing::{debug, info};
use zonekit_core::{
    AttrRef, Nameservers, Provider, ProviderKind, Record, RecordType, Result, SigningKey,
    ZoneError,
};

use super::scope::Scope;
use super::signing::{HostedZone, Signed, SigningState, Unsigned};
use super::Zone;
use crate::config::ZoneDefaults;
use crate::graph::{ResourceKind, ResourceSet};

/// Construct path prefix of LiveDNS zones.
const PATH_PREFIX: &str = "G";

/// A zone hosted on Gandi LiveDNS.
#[derive(Debug, Clone)]
pub struct LiveDnsZone<S: SigningState = Unsigned> {
    scope: Scope,
    nameservers: Option<AttrRef>,
    state: S,
}

impl LiveDnsZone<Unsigned> {
    /// Open zone `name` on a Gandi provider.
    pub fn new(name: &str, provider: &Provider, defaults: ZoneDefaults) -> Result<Self> {
        let scope = Scope::new(PATH_PREFIX, name, provider, ProviderKind::Gandi, defaults)?;
        debug!(zone = name, provider = %provider.reference(), "opened LiveDNS zone");
        Ok(Self {
            scope,
            nameservers: None,
            state: Unsigned,
        })
    }

    /// Generate a key-signing key managed by LiveDNS.
    pub fn sign(mut self) -> Result<LiveDnsZone<Signed>> {
        let ksk = self
            .scope
            .resource(ResourceKind::GandiLivednsKey, "KSK")?
            .attr("domain", self.scope.name.as_str());
        let key = SigningKey {
            public_key: ksk.reference("public_key").interpolate(),
            algorithm: ksk.reference("algorithm").interpolate(),
            ds_record: ksk.reference("ds").interpolate(),
        };
        self.scope.resources.push(ksk)?;
        info!(zone = %self.scope.name, "signed LiveDNS zone");
        Ok(LiveDnsZone {
            scope: self.scope,
            nameservers: self.nameservers,
            state: Signed(key),
        })
    }
}

impl<S: SigningState> LiveDnsZone<S> {
    /// Provider the zone's records are bound to.
    #[must_use]
    pub const fn provider(&self) -> &Provider {
        &self.scope.provider
    }
}

impl<S: SigningState> Zone for LiveDnsZone<S> {
    fn name(&self) -> &str {
        &self.scope.name
    }

    fn defaults(&self) -> &ZoneDefaults {
        &self.scope.defaults
    }

    fn record(&mut self, record: Record) -> Result<()> {
        if record.options.routing.is_some() {
            return Err(ZoneError::UnsupportedRouting {
                zone: self.scope.name.clone(),
            });
        }
        let ttl = record.ttl_or(self.scope.defaults.default_ttl);
        let Record {
            name,
            record_type,
            values,
            ..
        } = record;
        let values = if record_type == RecordType::Txt {
            values.map(|v| format!("\"{v}\""))
        } else {
            values
        };

        let resource = self
            .scope
            .resource(ResourceKind::GandiLivednsRecord, &format!("{record_type}-{name}"))?
            .attr("zone", self.scope.name.as_str())
            .attr("type", record_type.as_str())
            .attr("name", name.as_str())
            .attr("values", values.to_value())
            .attr("ttl", ttl);
        self.scope.resources.push(resource)?;
        debug!(zone = %self.scope.name, %record_type, name = %name, ttl, "declared LiveDNS record");
        Ok(())
    }
}

impl<S: SigningState> HostedZone for LiveDnsZone<S> {
    fn path(&self) -> &str {
        &self.scope.path
    }

    /// Nameservers as reported by LiveDNS, looked up once per zone.
    fn nameservers(&mut self) -> Result<Nameservers> {
        if let Some(reference) = &self.nameservers {
            return Ok(Nameservers::Reference(reference.clone()));
        }
        let lookup = self
            .scope
            .resource(ResourceKind::GandiLivednsDomainNs, "LiveDNSNS")?
            .attr("name", self.scope.name.as_str());
        let reference = self.scope.resources.push(lookup)?.reference("nameservers");
        self.nameservers = Some(reference.clone());
        Ok(Nameservers::Reference(reference))
    }

    fn signing_key(&self) -> Option<&SigningKey> {
        self.state.key()
    }

    fn resources(&self) -> &ResourceSet {
        &self.scope.resources
    }

    fn resources_mut(&mut self) -> &mut ResourceSet {
        &mut self.scope.resources
    }
}
