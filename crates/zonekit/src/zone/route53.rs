//! AWS Route53 backend.
//!
//! Opening a zone declares its hosted zone; records reference it by id and
//! carry fully qualified names. Web addresses are split by geolocation,
//! and signing goes through a customer-managed KMS key.

use serde_json::{json, Map, Value};
use tracing::{debug, info};
use zonekit_core::{
    AttrRef, Nameservers, Provider, ProviderKind, Record, RecordOptions, Result, Server,
    SigningKey, SigningKeyHandle, APEX,
};

use super::scope::Scope;
use super::signing::{HostedZone, Signed, SigningState, Unsigned};
use super::{bundles, geo, Zone};
use crate::config::ZoneDefaults;
use crate::graph::{ResourceKind, ResourceSet};

/// Construct path prefix of Route53 zones.
const PATH_PREFIX: &str = "R53";

/// A zone hosted on Route53.
#[derive(Debug, Clone)]
pub struct Route53Zone<S: SigningState = Unsigned> {
    scope: Scope,
    hosted_zone: String,
    state: S,
}

impl Route53Zone<Unsigned> {
    /// Open zone `name` and declare its hosted zone.
    pub fn new(name: &str, provider: &Provider, defaults: ZoneDefaults) -> Result<Self> {
        let mut scope = Scope::new(PATH_PREFIX, name, provider, ProviderKind::Aws, defaults)?;
        let zone = scope
            .resource(ResourceKind::AwsRoute53Zone, "zone")?
            .attr("name", name);
        let hosted_zone = scope.resources.push(zone)?.address();
        debug!(zone = name, provider = %provider.reference(), "opened Route53 zone");
        Ok(Self {
            scope,
            hosted_zone,
            state: Unsigned,
        })
    }

    /// Sign the zone with a key-signing key backed by `cmk`, then switch
    /// DNSSEC signing on once the key exists.
    pub fn sign(mut self, cmk: &SigningKeyHandle) -> Result<Route53Zone<Signed>> {
        let ksk = self
            .scope
            .resource(ResourceKind::AwsRoute53KeySigningKey, "KSK")?
            .attr("hosted_zone_id", self.zone_id().interpolate())
            .attr("key_management_service_arn", cmk.key_arn.as_str())
            .attr("name", ksk_name(&self.scope.name))
            .attr("status", "ACTIVE");
        let dnssec = self
            .scope
            .resource(ResourceKind::AwsRoute53HostedZoneDnssec, "DNSSEC")?
            .attr("hosted_zone_id", self.zone_id().interpolate())
            .attr("signing_status", "SIGNING")
            .depends_on(&ksk);
        let key = SigningKey {
            public_key: ksk.reference("public_key").interpolate(),
            algorithm: ksk.reference("signing_algorithm_type").interpolate(),
            ds_record: ksk.reference("ds_record").interpolate(),
        };
        self.scope.resources.push(ksk)?;
        self.scope.resources.push(dnssec)?;
        info!(zone = %self.scope.name, "signed Route53 zone");
        Ok(Route53Zone {
            scope: self.scope,
            hosted_zone: self.hosted_zone,
            state: Signed(key),
        })
    }
}

impl<S: SigningState> Route53Zone<S> {
    /// Hosted zone id, known once applied.
    #[must_use]
    pub fn zone_id(&self) -> AttrRef {
        AttrRef::new(self.hosted_zone.as_str(), "zone_id")
    }

    /// Hosted zone ARN, known once applied.
    #[must_use]
    pub fn arn(&self) -> AttrRef {
        AttrRef::new(self.hosted_zone.as_str(), "arn")
    }

    /// Create IAM user `username` allowed to change this zone's records.
    pub fn allow_user(&mut self, username: &str) -> Result<&mut Self> {
        let user = self
            .scope
            .resource(ResourceKind::AwsIamUser, &format!("IAM-{username}"))?
            .attr("name", username)
            .attr("path", "/");
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "Action": [
                        "route53:GetChange",
                        "route53:ChangeResourceRecordSets",
                        "route53:ListResourceRecordSets",
                    ],
                    "Resource": ["arn:aws:route53:::change/*", self.arn().interpolate()],
                },
                {
                    "Effect": "Allow",
                    "Action": ["route53:ListHostedZones"],
                    "Resource": "*",
                },
            ],
        });
        let user_policy = self
            .scope
            .resource(ResourceKind::AwsIamUserPolicy, &format!("IAM-{username}-policy"))?
            .attr("name", format!("AmazonRoute53-{}-FullAccess", self.scope.name))
            .attr("policy", serde_json::to_string(&policy)?)
            .attr("user", user.reference("name").interpolate());
        self.scope.resources.push(user)?;
        self.scope.resources.push(user_policy)?;
        info!(zone = %self.scope.name, user = username, "granted record access");
        Ok(self)
    }

    /// Owner name as Route53 expects it.
    fn qualify(&self, name: &str) -> String {
        if name == APEX {
            self.scope.name.clone()
        } else {
            format!("{name}.{}", self.scope.name)
        }
    }
}

/// Key-signing key name: the zone name stripped to ASCII alphanumerics.
fn ksk_name(zone: &str) -> String {
    zone.chars().filter(char::is_ascii_alphanumeric).collect()
}

impl<S: SigningState> Zone for Route53Zone<S> {
    fn name(&self) -> &str {
        &self.scope.name
    }

    fn defaults(&self) -> &ZoneDefaults {
        &self.scope.defaults
    }

    fn record(&mut self, record: Record) -> Result<()> {
        let ttl = record.ttl_or(self.scope.defaults.default_ttl);
        let qualified = self.qualify(&record.name);
        let Record {
            name,
            record_type,
            values,
            options,
        } = record;
        let id = match &options.routing {
            Some(routing) => format!("{record_type}-{}-{name}", routing.set_identifier),
            None => format!("{record_type}-{name}"),
        };

        let mut resource = self
            .scope
            .resource(ResourceKind::AwsRoute53Record, &id)?
            .attr("zone_id", self.zone_id().interpolate())
            .attr("type", record_type.as_str())
            .attr("name", qualified.as_str())
            .attr("records", values.to_value())
            .attr("ttl", ttl);
        if let Some(routing) = options.routing {
            let mut policy = Map::new();
            policy.insert(
                routing.geolocation.scope.as_str().to_string(),
                Value::String(routing.geolocation.value),
            );
            resource = resource
                .attr("set_identifier", routing.set_identifier)
                .attr("geolocation_routing_policy", vec![Value::Object(policy)]);
        }
        self.scope.resources.push(resource)?;
        debug!(zone = %self.scope.name, %record_type, name = %qualified, ttl, "declared Route53 record");
        Ok(())
    }

    /// One address record set per geolocation bucket.
    fn web_addresses(
        &mut self,
        name: &str,
        servers: &[&Server],
        options: &RecordOptions,
    ) -> Result<()> {
        for bucket in geo::partition(servers)? {
            let routed = options.clone().routing(bucket.location);
            bundles::address_records(self, name, bucket.servers, &routed)?;
        }
        Ok(())
    }
}

impl<S: SigningState> HostedZone for Route53Zone<S> {
    fn path(&self) -> &str {
        &self.scope.path
    }

    fn nameservers(&mut self) -> Result<Nameservers> {
        Ok(Nameservers::Reference(AttrRef::new(
            self.hosted_zone.as_str(),
            "name_servers",
        )))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PublishedRecord;
    use crate::zone::ZoneExt;
    use zonekit_core::{RecordType, ZoneError};

    fn zone(name: &str) -> Route53Zone {
        Route53Zone::new(name, &Provider::aws("main"), ZoneDefaults::new("luffy.cx")).unwrap()
    }

    fn records(zone: &Route53Zone<impl SigningState>) -> Vec<PublishedRecord> {
        zone.resources().records().collect()
    }

    #[test]
    fn test_new_declares_hosted_zone() {
        let zone = zone("bernat.ch");
        let hosted = zone.resources().iter().next().unwrap();
        assert_eq!(hosted.kind, ResourceKind::AwsRoute53Zone);
        assert_eq!(hosted.path, "R53-bernat.ch/zone");
        assert_eq!(hosted.str_attr("name"), Some("bernat.ch"));
        assert_eq!(zone.zone_id(), hosted.reference("zone_id"));
    }

    #[test]
    fn test_names_are_qualified() {
        let mut zone = zone("bernat.ch");
        zone.cname("4unklrhyt7lw.vincent", "gv-qcgpdhlvhtgedt.dv.googlehosted.com.")
            .unwrap()
            .txt("@", "v=spf1 include:spf.messagingengine.com ~all")
            .unwrap();
        let records = records(&zone);
        assert_eq!(records[0].name, "4unklrhyt7lw.vincent.bernat.ch");
        assert_eq!(records[1].name, "bernat.ch");
        // TXT values go through untouched.
        assert_eq!(records[1].values, ["v=spf1 include:spf.messagingengine.com ~all"]);
        assert_eq!(records[1].ttl, 86400);
    }

    #[test]
    fn test_record_references_hosted_zone() {
        let mut zone = zone("bernat.ch");
        zone.a("vincent", "192.0.2.1").unwrap();
        let record = zone.resources().of_kind(ResourceKind::AwsRoute53Record).next().unwrap();
        assert_eq!(record.path, "R53-bernat.ch/A-vincent");
        assert_eq!(record.str_attr("zone_id"), Some(zone.zone_id().interpolate().as_str()));
        assert!(record.attributes.get("set_identifier").is_none());
    }

    #[test]
    fn test_www_partitions_by_geolocation() {
        let servers = vec![
            Server::new("web03.luffy.cx")
                .ipv4("192.0.2.3")
                .ipv6("2001:db8::3")
                .tag("web")
                .tag("continent:EU")
                .tag("country:FI"),
            Server::new("web04.luffy.cx")
                .ipv4("192.0.2.4")
                .ipv6("2001:db8::4")
                .tag("web")
                .tag("continent:NA"),
            Server::new("web05.luffy.cx").ipv4("192.0.2.5").tag("web").disable(),
        ];
        let mut zone = zone("bernat.ch");
        zone.www("@", &servers).unwrap();

        let a: Vec<PublishedRecord> = records(&zone)
            .into_iter()
            .filter(|r| r.record_type == RecordType::A)
            .collect();
        let sets: Vec<_> = a.iter().map(|r| r.set_identifier.as_deref().unwrap()).collect();
        assert_eq!(
            sets,
            ["geo-country-*", "geo-continent-EU", "geo-country-FI", "geo-continent-NA"]
        );
        assert_eq!(a[0].values, ["192.0.2.3", "192.0.2.4"]);
        assert_eq!(a[2].values, ["192.0.2.3"]);
        assert!(a.iter().all(|r| r.name == "bernat.ch" && r.ttl == 7200));

        let routed = zone
            .resources()
            .get("R53-bernat.ch/AAAA-geo-continent-NA-@")
            .unwrap();
        assert_eq!(
            routed.attributes["geolocation_routing_policy"],
            json!([{ "continent": "NA" }])
        );
        // CAA and ACME are not routed.
        let caa = records(&zone)
            .into_iter()
            .find(|r| r.record_type == RecordType::Caa)
            .unwrap();
        assert_eq!(caa.set_identifier, None);
    }

    #[test]
    fn test_sign_declares_ksk_then_dnssec() {
        let handle = SigningKeyHandle::new("${aws_kms_alias.dns-cmk.target_key_arn}");
        let zone = zone("acme.luffy.cx").sign(&handle).unwrap();

        let ksk = zone
            .resources()
            .of_kind(ResourceKind::AwsRoute53KeySigningKey)
            .next()
            .unwrap();
        assert_eq!(ksk.str_attr("name"), Some("acmeluffycx"));
        assert_eq!(ksk.str_attr("status"), Some("ACTIVE"));
        assert_eq!(
            ksk.str_attr("key_management_service_arn"),
            Some("${aws_kms_alias.dns-cmk.target_key_arn}")
        );
        let dnssec = zone
            .resources()
            .of_kind(ResourceKind::AwsRoute53HostedZoneDnssec)
            .next()
            .unwrap();
        assert_eq!(dnssec.depends_on, [ksk.address()]);
        assert_eq!(dnssec.str_attr("signing_status"), Some("SIGNING"));

        let key = zone.signing_key().unwrap();
        assert_eq!(key.algorithm, ksk.reference("signing_algorithm_type").interpolate());
    }

    #[test]
    fn test_allow_user() {
        let mut zone = zone("y.luffy.cx");
        zone.allow_user("DDNS").unwrap();

        let user = zone.resources().get("R53-y.luffy.cx/IAM-DDNS").unwrap();
        assert_eq!(user.str_attr("path"), Some("/"));
        let policy = zone.resources().get("R53-y.luffy.cx/IAM-DDNS-policy").unwrap();
        assert_eq!(policy.str_attr("name"), Some("AmazonRoute53-y.luffy.cx-FullAccess"));
        let document: Value = serde_json::from_str(policy.str_attr("policy").unwrap()).unwrap();
        assert_eq!(document["Statement"][0]["Resource"][1], zone.arn().interpolate());
        assert_eq!(document["Statement"][1]["Action"][0], "route53:ListHostedZones");

        assert!(matches!(
            zone.allow_user("DDNS"),
            Err(ZoneError::DuplicateResource { .. })
        ));
    }

    #[test]
    fn test_nameservers_reference_hosted_zone() {
        let mut zone = zone("y.luffy.cx");
        let Nameservers::Reference(reference) = zone.nameservers().unwrap() else {
            panic!("expected a reference");
        };
        assert_eq!(reference.attribute, "name_servers");
        assert_eq!(reference.address, zone.zone_id().address);
    }

    #[test]
    fn test_delegation_to_referenced_child_keeps_expression() {
        let mut child = zone("y.luffy.cx");
        let summary = child.summary().unwrap();
        let mut parent = zone("luffy.cx");
        parent.delegate("y", &summary).unwrap();

        let ns = parent
            .resources()
            .of_kind(ResourceKind::AwsRoute53Record)
            .find(|r| r.str_attr("type") == Some("NS"))
            .unwrap();
        assert_eq!(ns.str_attr("name"), Some("y.luffy.cx"));
        assert_eq!(
            ns.attributes["records"],
            format!(
                "${{formatlist(\"%s.\", {}.name_servers)}}",
                child.zone_id().address
            )
        );
    }
}
