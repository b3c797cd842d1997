//! Fan-out of one logical zone onto several concrete zones.

use zonekit_core::{Record, RecordOptions, Result, Server, ZoneError};

use super::Zone;
use crate::config::ZoneDefaults;

/// Composite zone forwarding every protocol call to its members, in order.
///
/// The first member is the primary: it names the group and provides the
/// defaults. Bundles are forwarded as bundles, so each member applies them
/// with its own name, TTLs and web-address hook.
///
/// ```rust
/// use zonekit::{LiveDnsZone, MultiZone, Provider, Route53Zone, Zone, ZoneDefaults, ZoneExt};
///
/// let defaults = ZoneDefaults::new("luffy.cx");
/// let mut primary = Route53Zone::new("bernat.ch", &Provider::aws("main"), defaults.clone())?;
/// let mut backup = LiveDnsZone::new("bernat.ch", &Provider::gandi("vb"), defaults)?;
/// MultiZone::new(vec![&mut primary as &mut dyn Zone, &mut backup])?
///     .fastmail_mx(&["vincent"])?
///     .fastmail_services()?;
/// # Ok::<(), zonekit::ZoneError>(())
/// ```
pub struct MultiZone<'a, Z: Zone + ?Sized = dyn Zone> {
    primary: &'a mut Z,
    backups: Vec<&'a mut Z>,
}

impl<'a, Z: Zone + ?Sized> MultiZone<'a, Z> {
    /// Group `zones`, the first one being the primary.
    pub fn new(zones: Vec<&'a mut Z>) -> Result<Self> {
        let mut zones = zones.into_iter();
        let primary = zones.next().ok_or(ZoneError::EmptyFanOut)?;
        Ok(Self {
            primary,
            backups: zones.collect(),
        })
    }

    /// Number of member zones.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.backups.len()
    }

    /// A group is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Names of the members, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(self.primary.name())
            .chain(self.backups.iter().map(|z| z.name()))
            .collect()
    }

    /// Members, primary first.
    pub fn members(&mut self) -> Vec<&mut Z> {
        let mut members = Vec::with_capacity(self.len());
        members.push(&mut *self.primary);
        members.extend(self.backups.iter_mut().map(|z| &mut **z));
        members
    }

    fn broadcast(&mut self, call: impl FnMut(&mut Z) -> Result<()>) -> Result<()> {
        self.members().into_iter().try_for_each(call)
    }
}

impl<Z: Zone + ?Sized> std::fmt::Debug for MultiZone<'_, Z> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiZone").field("members", &self.names()).finish()
    }
}

impl<Z: Zone + ?Sized> Zone for MultiZone<'_, Z> {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn defaults(&self) -> &ZoneDefaults {
        self.primary.defaults()
    }

    fn record(&mut self, record: Record) -> Result<()> {
        self.broadcast(|zone| zone.record(record.clone()))
    }

    fn web_addresses(
        &mut self,
        name: &str,
        servers: &[&Server],
        options: &RecordOptions,
    ) -> Result<()> {
        self.broadcast(|zone| zone.web_addresses(name, servers, options))
    }

    fn mail_hosting(&mut self, subdomains: &[&str]) -> Result<()> {
        self.broadcast(|zone| zone.mail_hosting(subdomains))
    }

    fn mail_services(&mut self) -> Result<()> {
        self.broadcast(|zone| zone.mail_services())
    }

    fn web_hosting(&mut self, name: &str, servers: &[Server], options: &RecordOptions) -> Result<()> {
        self.broadcast(|zone| zone.web_hosting(name, servers, options))
    }

    fn server_names(&mut self, servers: &[Server], options: &RecordOptions) -> Result<()> {
        self.broadcast(|zone| zone.server_names(servers, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PublishedRecord;
    use crate::zone::livedns::LiveDnsZone;
    use crate::zone::route53::Route53Zone;
    use crate::zone::signing::HostedZone;
    use crate::zone::ZoneExt;
    use zonekit_core::{Provider, RecordType};

    fn defaults() -> ZoneDefaults {
        ZoneDefaults::new("luffy.cx")
    }

    fn livedns(name: &str) -> LiveDnsZone {
        LiveDnsZone::new(name, &Provider::gandi("vb"), defaults()).unwrap()
    }

    fn route53(name: &str) -> Route53Zone {
        Route53Zone::new(name, &Provider::aws("main"), defaults()).unwrap()
    }

    fn servers() -> Vec<Server> {
        vec![
            Server::new("web03.luffy.cx")
                .ipv4("192.0.2.3")
                .ipv6("2001:db8::3")
                .tag("web")
                .tag("continent:EU"),
            Server::new("web04.luffy.cx")
                .ipv4("192.0.2.4")
                .tag("web")
                .tag("isso"),
        ]
    }

    fn published(zone: &impl HostedZone) -> Vec<PublishedRecord> {
        zone.resources().records().collect()
    }

    /// Same chain of calls, applied to any zone.
    fn build<Z: Zone + ?Sized>(zone: &mut Z, servers: &[Server]) -> Result<()> {
        zone.www("@", servers)?
            .www("*.pages", servers)?
            .fastmail_mx(&["vincent"])?
            .fastmail_services()?
            .servers(servers)?
            .cname("eizo", "eizo.y.luffy.cx.")?
            .a_aaaa("comments", servers.iter().filter(|s| s.has_tag("isso")), RecordOptions::default())?;
        Ok(())
    }

    #[test]
    fn test_empty_fan_out() {
        let err = MultiZone::<dyn Zone>::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ZoneError::EmptyFanOut));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_fan_out_equals_direct_calls() {
        let servers = servers();
        let (mut r53, mut gandi) = (route53("luffy.cx"), livedns("luffy.cx"));
        {
            let mut group = MultiZone::new(vec![&mut r53 as &mut dyn Zone, &mut gandi]).unwrap();
            assert_eq!(group.len(), 2);
            assert_eq!(group.name(), "luffy.cx");
            build(&mut group, &servers).unwrap();
        }

        let (mut direct_r53, mut direct_gandi) = (route53("luffy.cx"), livedns("luffy.cx"));
        build(&mut direct_r53, &servers).unwrap();
        build(&mut direct_gandi, &servers).unwrap();

        assert_eq!(published(&r53), published(&direct_r53));
        assert_eq!(published(&gandi), published(&direct_gandi));
        // Route53 still partitions through the group; LiveDNS does not.
        assert!(published(&r53).iter().any(|r| r.set_identifier.is_some()));
        assert!(published(&gandi).iter().all(|r| r.set_identifier.is_none()));
    }

    #[test]
    fn test_single_member_fan_out() {
        let servers = servers();
        let mut grouped = livedns("enxio.fr");
        build(&mut MultiZone::new(vec![&mut grouped]).unwrap(), &servers).unwrap();

        let mut direct = livedns("enxio.fr");
        build(&mut direct, &servers).unwrap();
        assert_eq!(published(&grouped), published(&direct));
    }

    #[test]
    fn test_bundles_use_member_names() {
        let (mut a, mut b) = (livedns("enxio.fr"), livedns("enx.io"));
        MultiZone::new(vec![&mut a, &mut b])
            .unwrap()
            .fastmail_mx(&[])
            .unwrap();

        let dkim = |zone: &LiveDnsZone| {
            published(zone)
                .into_iter()
                .find(|r| r.name == "fm1._domainkey")
                .unwrap()
                .values
        };
        assert_eq!(dkim(&a), ["fm1.enxio.fr.dkim.fmhosted.com."]);
        assert_eq!(dkim(&b), ["fm1.enx.io.dkim.fmhosted.com."]);
    }

    #[test]
    fn test_calls_interleave_in_member_order() {
        let (mut a, mut b) = (livedns("enxio.fr"), livedns("enx.io"));
        let mut group = MultiZone::new(vec![&mut a, &mut b]).unwrap();
        let names: Vec<String> = group.members().into_iter().map(|z| z.name().to_string()).collect();
        assert_eq!(names, ["enxio.fr", "enx.io"]);
        group.a("www", "192.0.2.1").unwrap().a("media", "192.0.2.1").unwrap();
        drop(group);
        assert_eq!(published(&a).len(), 2);
        assert_eq!(published(&b).len(), 2);
    }

    #[test]
    fn test_failure_aborts_broadcast() {
        let (mut a, mut b) = (livedns("enxio.fr"), livedns("enx.io"));
        b.a("www", "192.0.2.9").unwrap();
        let mut group = MultiZone::new(vec![&mut a, &mut b]).unwrap();
        let err = group.a("www", "192.0.2.1").unwrap_err();
        assert!(matches!(err, ZoneError::DuplicateResource { .. }));
        assert!(group.mx("@", "10 mx.enx.io.").is_ok());
        drop(group);
        assert_eq!(published(&a).len(), 2);
        assert_eq!(
            published(&b).iter().filter(|r| r.record_type == RecordType::A).count(),
            1
        );
    }
}
