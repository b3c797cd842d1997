//! Record bundles written purely against the [`Zone`] protocol.

use hickory_proto::rr::Name;
use tracing::debug;
use zonekit_core::{Record, RecordOptions, RecordType, Result, Server, APEX};

use super::Zone;

/// Fastmail inbound MX hosts, with preference.
pub const FASTMAIL_MX: [&str; 2] = [
    "10 in1-smtp.messagingengine.com.",
    "20 in2-smtp.messagingengine.com.",
];

/// SPF policy for Fastmail-hosted mail.
pub const FASTMAIL_SPF: &str = "v=spf1 include:spf.messagingengine.com ~all";

/// DMARC policy published at `_dmarc`.
pub const DMARC_POLICY: &str = "v=DMARC1; p=none; sp=none";

/// DKIM selectors delegated to Fastmail.
pub const DKIM_SELECTORS: [&str; 4] = ["mesmtp", "fm1", "fm2", "fm3"];

/// Client services: (service, TLS port). Each gets a `<svc>s` record and a
/// "not available" record for its plaintext variant.
const MAIL_SERVICES: [(&str, u16); 3] = [("imap", 993), ("carddav", 443), ("caldav", 443)];

/// CAA value allowing Let's Encrypt to issue.
pub const CAA_ISSUE: &str = "0 issue \"letsencrypt.org\"";

/// CAA value forbidding wildcard issuance.
pub const CAA_NO_WILDCARD: &str = "0 issuewild \";\"";

/// CAA value allowing Let's Encrypt wildcard issuance.
pub const CAA_WILDCARD: &str = "0 issuewild \"letsencrypt\"";

/// Label receiving ACME DNS-01 challenges.
pub const ACME_CHALLENGE: &str = "_acme-challenge";

/// Target of the DKIM CNAME for `selector` in `zone`.
#[must_use]
pub fn dkim_target(selector: &str, zone: &str) -> String {
    format!("{selector}.{zone}.dkim.fmhosted.com.")
}

/// CAA and ACME records protecting one web name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcmePolicy {
    /// Owner of the CAA record
    pub caa_name: String,
    /// CAA values
    pub caa_values: [&'static str; 2],
    /// Owner of the challenge CNAME
    pub challenge_name: String,
    /// Where challenges are answered
    pub challenge_target: String,
}

impl AcmePolicy {
    /// Policy for web name `name` in `zone`, challenges delegated under
    /// `acme.<acme_root>`.
    ///
    /// The apex and plain names forbid wildcard certificates; `*.<sub>`
    /// allows them for `<sub>`.
    #[must_use]
    pub fn for_name(zone: &str, acme_root: &str, name: &str) -> Self {
        if name == APEX {
            return Self {
                caa_name: APEX.to_string(),
                caa_values: [CAA_ISSUE, CAA_NO_WILDCARD],
                challenge_name: ACME_CHALLENGE.to_string(),
                challenge_target: format!("{zone}.acme.{acme_root}."),
            };
        }
        let (owner, wildcard) = name
            .strip_prefix("*.")
            .map_or((name, CAA_NO_WILDCARD), |sub| (sub, CAA_WILDCARD));
        Self {
            caa_name: owner.to_string(),
            caa_values: [CAA_ISSUE, wildcard],
            challenge_name: format!("{ACME_CHALLENGE}.{owner}"),
            challenge_target: format!("{owner}.{zone}.acme.{acme_root}."),
        }
    }
}

/// One A record with every IPv4 address and one AAAA record with every
/// IPv6 address of `servers`.
///
/// A family without any address is skipped.
pub fn address_records<'s, Z>(
    zone: &mut Z,
    name: &str,
    servers: impl IntoIterator<Item = &'s Server>,
    options: &RecordOptions,
) -> Result<()>
where
    Z: Zone + ?Sized,
{
    let mut v4 = Vec::new();
    let mut v6 = Vec::new();
    for server in servers {
        v4.extend(server.ipv4_address.iter().cloned());
        v6.extend(server.ipv6_address.iter().cloned());
    }
    for (record_type, addresses) in [(RecordType::A, v4), (RecordType::Aaaa, v6)] {
        if addresses.is_empty() {
            continue;
        }
        zone.record(Record::new(name, record_type, addresses).with_options(options.clone()))?;
    }
    Ok(())
}

/// MX for each subdomain, the apex and `*`, then SPF, DKIM and DMARC.
pub fn mail_hosting<Z: Zone + ?Sized>(zone: &mut Z, subdomains: &[&str]) -> Result<()> {
    for name in subdomains.iter().copied().chain([APEX, "*"]) {
        zone.record(Record::new(name, RecordType::Mx, FASTMAIL_MX))?;
    }
    zone.record(Record::new(APEX, RecordType::Txt, FASTMAIL_SPF))?;
    let zone_name = zone.name().to_string();
    for selector in DKIM_SELECTORS {
        zone.record(Record::new(
            format!("{selector}._domainkey"),
            RecordType::Cname,
            dkim_target(selector, &zone_name),
        ))?;
    }
    zone.record(Record::new("_dmarc", RecordType::Txt, DMARC_POLICY))?;
    debug!(zone = %zone_name, subdomains = subdomains.len(), "mail hosting records");
    Ok(())
}

/// Submission plus TLS-only IMAP, CardDAV and CalDAV service records.
pub fn mail_services<Z: Zone + ?Sized>(zone: &mut Z) -> Result<()> {
    zone.record(Record::new(
        "_submission._tcp",
        RecordType::Srv,
        "0 1 587 smtp.fastmail.com.",
    ))?;
    for (service, port) in MAIL_SERVICES {
        // Target "." with zero priority, weight and port: service not offered.
        zone.record(Record::new(format!("_{service}._tcp"), RecordType::Srv, "0 0 0 ."))?;
        zone.record(Record::new(
            format!("_{service}s._tcp"),
            RecordType::Srv,
            format!("0 1 {port} {service}.fastmail.com."),
        ))?;
    }
    Ok(())
}

/// Addresses of enabled `web` servers, then CAA and ACME challenge CNAME.
pub fn web_hosting<Z: Zone + ?Sized>(
    zone: &mut Z,
    name: &str,
    servers: &[Server],
    options: &RecordOptions,
) -> Result<()> {
    let web: Vec<&Server> = servers.iter().filter(|s| s.serves_web()).collect();
    let web_options = options.clone().ttl(zone.defaults().web_ttl);
    zone.web_addresses(name, &web, &web_options)?;

    let policy = AcmePolicy::for_name(zone.name(), &zone.defaults().acme_root, name);
    zone.record(Record::new(
        policy.caa_name.as_str(),
        RecordType::Caa,
        policy.caa_values,
    ))?;
    zone.record(Record::new(
        policy.challenge_name.as_str(),
        RecordType::Cname,
        policy.challenge_target.as_str(),
    ))?;
    debug!(zone = %zone.name(), name, servers = web.len(), "web hosting records");
    Ok(())
}

/// A/AAAA per server whose name lies strictly below the zone, named by the
/// labels left of the zone.
pub fn server_names<Z: Zone + ?Sized>(
    zone: &mut Z,
    servers: &[Server],
    options: &RecordOptions,
) -> Result<()> {
    let origin = super::parse_zone_name(zone.name())?;
    for server in servers {
        let Some(label) = relative_label(&origin, &server.name) else {
            continue;
        };
        address_records(zone, &label, std::slice::from_ref(server), options)?;
    }
    Ok(())
}

/// Part of `host` left of `origin`, if `host` is a strict subdomain.
fn relative_label(origin: &Name, host: &str) -> Option<String> {
    let host_name = Name::from_ascii(host.trim_end_matches('.')).ok()?;
    if !origin.zone_of(&host_name) || host_name.num_labels() <= origin.num_labels() {
        return None;
    }
    let depth = usize::from(host_name.num_labels() - origin.num_labels());
    let labels: Vec<&str> = host.trim_end_matches('.').split('.').take(depth).collect();
    Some(labels.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneDefaults;
    use zonekit_core::Values;

    /// Zone recording every call, for checking bundles in isolation.
    struct Recorder {
        defaults: ZoneDefaults,
        records: Vec<Record>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                defaults: ZoneDefaults::new("luffy.cx"),
                records: Vec::new(),
            }
        }

        fn named(&self, record_type: RecordType) -> Vec<&str> {
            self.records
                .iter()
                .filter(|r| r.record_type == record_type)
                .map(|r| r.name.as_str())
                .collect()
        }

        fn find(&self, name: &str, record_type: RecordType) -> &Record {
            self.records
                .iter()
                .find(|r| r.name == name && r.record_type == record_type)
                .unwrap()
        }
    }

    impl Zone for Recorder {
        fn name(&self) -> &str {
            "bernat.ch"
        }

        fn defaults(&self) -> &ZoneDefaults {
            &self.defaults
        }

        fn record(&mut self, record: Record) -> Result<()> {
            self.records.push(record);
            Ok(())
        }
    }

    fn web_servers() -> Vec<Server> {
        vec![
            Server::new("web03.luffy.cx")
                .ipv4("192.0.2.3")
                .ipv6("2001:db8::3")
                .tag("web"),
            Server::new("web04.luffy.cx")
                .ipv4("192.0.2.4")
                .ipv6("2001:db8::4")
                .tag("web"),
            Server::new("web05.luffy.cx")
                .ipv4("192.0.2.5")
                .tag("web")
                .disable(),
            Server::new("db01.luffy.cx").ipv4("192.0.2.9"),
        ]
    }

    #[test]
    fn test_mail_hosting_with_subdomain() {
        let mut zone = Recorder::new();
        mail_hosting(&mut zone, &["a"]).unwrap();

        assert_eq!(zone.named(RecordType::Mx), ["a", "@", "*"]);
        assert_eq!(zone.named(RecordType::Cname).len(), 4);
        assert_eq!(zone.named(RecordType::Txt), ["@", "_dmarc"]);
        assert_eq!(
            zone.find("fm1._domainkey", RecordType::Cname).values.as_slice(),
            ["fm1.bernat.ch.dkim.fmhosted.com."]
        );
        assert_eq!(
            zone.find("@", RecordType::Txt).values.as_slice(),
            [FASTMAIL_SPF]
        );
    }

    #[test]
    fn test_mail_services() {
        let mut zone = Recorder::new();
        mail_services(&mut zone).unwrap();

        assert_eq!(zone.records.len(), 7);
        assert!(zone.records.iter().all(|r| r.record_type == RecordType::Srv));
        for legacy in ["_imap._tcp", "_carddav._tcp", "_caldav._tcp"] {
            assert_eq!(zone.find(legacy, RecordType::Srv).values.as_slice(), ["0 0 0 ."]);
        }
        assert_eq!(
            zone.find("_imaps._tcp", RecordType::Srv).values.as_slice(),
            ["0 1 993 imap.fastmail.com."]
        );
        assert_eq!(
            zone.find("_submission._tcp", RecordType::Srv).values.as_slice(),
            ["0 1 587 smtp.fastmail.com."]
        );
    }

    #[test]
    fn test_acme_policy_apex() {
        let policy = AcmePolicy::for_name("bernat.ch", "luffy.cx", "@");
        assert_eq!(policy.caa_name, "@");
        assert_eq!(policy.caa_values, [CAA_ISSUE, "0 issuewild \";\""]);
        assert_eq!(policy.challenge_name, "_acme-challenge");
        assert_eq!(policy.challenge_target, "bernat.ch.acme.luffy.cx.");
    }

    #[test]
    fn test_acme_policy_wildcard() {
        let policy = AcmePolicy::for_name("luffy.cx", "luffy.cx", "*.shop");
        assert_eq!(policy.caa_name, "shop");
        assert_eq!(policy.caa_values, [CAA_ISSUE, "0 issuewild \"letsencrypt\""]);
        assert_eq!(policy.challenge_name, "_acme-challenge.shop");
        assert_eq!(policy.challenge_target, "shop.luffy.cx.acme.luffy.cx.");
    }

    #[test]
    fn test_acme_policy_plain_name() {
        let policy = AcmePolicy::for_name("bernat.ch", "luffy.cx", "media");
        assert_eq!(policy.caa_name, "media");
        assert_eq!(policy.caa_values, [CAA_ISSUE, CAA_NO_WILDCARD]);
        assert_eq!(policy.challenge_name, "_acme-challenge.media");
        assert_eq!(policy.challenge_target, "media.bernat.ch.acme.luffy.cx.");
    }

    #[test]
    fn test_web_hosting_filters_and_forces_ttl() {
        let mut zone = Recorder::new();
        web_hosting(&mut zone, "www", &web_servers(), &RecordOptions::default().ttl(60)).unwrap();

        let a = zone.find("www", RecordType::A);
        assert_eq!(a.values.as_slice(), ["192.0.2.3", "192.0.2.4"]);
        assert_eq!(a.options.ttl, Some(7200));
        let aaaa = zone.find("www", RecordType::Aaaa);
        assert_eq!(aaaa.values.as_slice(), ["2001:db8::3", "2001:db8::4"]);
        assert_eq!(
            zone.find("www", RecordType::Caa).values,
            Values::from([CAA_ISSUE, CAA_NO_WILDCARD])
        );
        assert_eq!(
            zone.find("_acme-challenge.www", RecordType::Cname).values.as_slice(),
            ["www.bernat.ch.acme.luffy.cx."]
        );
        // CAA and ACME records keep the zone default TTL.
        assert_eq!(zone.find("www", RecordType::Caa).options.ttl, None);
    }

    #[test]
    fn test_web_hosting_without_web_servers() {
        let mut zone = Recorder::new();
        web_hosting(&mut zone, "@", &[], &RecordOptions::default()).unwrap();
        assert_eq!(zone.named(RecordType::Caa), ["@"]);
        assert_eq!(zone.named(RecordType::Cname), ["_acme-challenge"]);
        assert!(zone.named(RecordType::A).is_empty());
    }

    #[test]
    fn test_address_records_skip_missing_family() {
        let mut zone = Recorder::new();
        let servers = [Server::new("a").ipv4("192.0.2.1")];
        address_records(&mut zone, "comments", &servers, &RecordOptions::default()).unwrap();
        assert_eq!(zone.records.len(), 1);
        assert_eq!(zone.records[0].record_type, RecordType::A);
    }

    #[test]
    fn test_server_names() {
        let mut zone = Recorder::new();
        let servers = vec![
            Server::new("web03.bernat.ch").ipv4("192.0.2.3").ipv6("2001:db8::3"),
            Server::new("db.eu.bernat.ch").ipv4("192.0.2.7"),
            Server::new("bernat.ch").ipv4("192.0.2.8"),
            Server::new("web04.notbernat.ch").ipv4("192.0.2.4"),
            Server::new("web04.luffy.cx").ipv4("192.0.2.4"),
        ];
        server_names(&mut zone, &servers, &RecordOptions::default()).unwrap();
        assert_eq!(zone.named(RecordType::A), ["web03", "db.eu"]);
        assert_eq!(zone.named(RecordType::Aaaa), ["web03"]);
    }

    #[test]
    fn test_relative_label_is_case_insensitive() {
        let origin = Name::from_ascii("luffy.cx").unwrap();
        assert_eq!(relative_label(&origin, "Web03.LUFFY.cx").as_deref(), Some("Web03"));
        assert_eq!(relative_label(&origin, "luffy.cx"), None);
    }
}
