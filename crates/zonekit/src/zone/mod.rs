//! The zone protocol and its backends.
//!
//! A backend implements one primitive, [`Zone::record`]. The bundles
//! (mail hosting, web hosting, server names) are free functions in
//! [`bundles`] written against the protocol; they are exposed as provided
//! trait methods so that a [`MultiZone`](multi::MultiZone) can forward them
//! member by member, each member applying them with its own zone name.
//!
//! [`ZoneExt`] adds the chainable surface (`zone.www(..)?.fastmail_mx(..)?`).

pub mod bundles;
pub mod geo;
pub mod livedns;
pub mod multi;
pub mod route53;
mod scope;
pub mod signing;

use hickory_proto::rr::Name;
use zonekit_core::{
    Record, RecordOptions, RecordType, Result, Server, Values, ZoneError, ZoneSummary,
};

use crate::config::ZoneDefaults;

/// Operations every zone (or group of zones) supports.
pub trait Zone {
    /// Zone name, without trailing dot.
    fn name(&self) -> &str;

    /// Defaults applied to this zone's records.
    fn defaults(&self) -> &ZoneDefaults;

    /// Declare one record.
    fn record(&mut self, record: Record) -> Result<()>;

    /// Address records for web names.
    ///
    /// Backends with routing capabilities override this to split answers.
    fn web_addresses(
        &mut self,
        name: &str,
        servers: &[&Server],
        options: &RecordOptions,
    ) -> Result<()> {
        bundles::address_records(self, name, servers.iter().copied(), options)
    }

    /// Fastmail MX, SPF, DKIM and DMARC records.
    fn mail_hosting(&mut self, subdomains: &[&str]) -> Result<()> {
        bundles::mail_hosting(self, subdomains)
    }

    /// Fastmail submission, IMAP, CardDAV and CalDAV service records.
    fn mail_services(&mut self) -> Result<()> {
        bundles::mail_services(self)
    }

    /// Addresses, CAA and ACME delegation for a web name.
    fn web_hosting(&mut self, name: &str, servers: &[Server], options: &RecordOptions) -> Result<()> {
        bundles::web_hosting(self, name, servers, options)
    }

    /// Addresses for servers named under this zone.
    fn server_names(&mut self, servers: &[Server], options: &RecordOptions) -> Result<()> {
        bundles::server_names(self, servers, options)
    }
}

/// Chainable helpers over any [`Zone`].
pub trait ZoneExt: Zone {
    /// Declare a record with explicit options.
    fn rr(
        &mut self,
        name: &str,
        record_type: RecordType,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.record(Record::new(name, record_type, values).with_options(options))?;
        Ok(self)
    }

    /// A record.
    fn a(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.a_with(name, values, RecordOptions::default())
    }

    /// A record with explicit options.
    fn a_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::A, values, options)
    }

    /// AAAA record.
    fn aaaa(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.aaaa_with(name, values, RecordOptions::default())
    }

    /// AAAA record with explicit options.
    fn aaaa_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Aaaa, values, options)
    }

    /// CAA record.
    fn caa(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.caa_with(name, values, RecordOptions::default())
    }

    /// CAA record with explicit options.
    fn caa_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Caa, values, options)
    }

    /// CNAME record.
    fn cname(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.cname_with(name, values, RecordOptions::default())
    }

    /// CNAME record with explicit options.
    fn cname_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Cname, values, options)
    }

    /// DS record.
    fn ds(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.ds_with(name, values, RecordOptions::default())
    }

    /// DS record with explicit options.
    fn ds_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Ds, values, options)
    }

    /// MX record.
    fn mx(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.mx_with(name, values, RecordOptions::default())
    }

    /// MX record with explicit options.
    fn mx_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Mx, values, options)
    }

    /// NS record.
    fn ns(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.ns_with(name, values, RecordOptions::default())
    }

    /// NS record with explicit options.
    fn ns_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Ns, values, options)
    }

    /// SRV record.
    fn srv(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.srv_with(name, values, RecordOptions::default())
    }

    /// SRV record with explicit options.
    fn srv_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Srv, values, options)
    }

    /// TXT record.
    fn txt(&mut self, name: &str, values: impl Into<Values>) -> Result<&mut Self> {
        self.txt_with(name, values, RecordOptions::default())
    }

    /// TXT record with explicit options.
    fn txt_with(
        &mut self,
        name: &str,
        values: impl Into<Values>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        self.rr(name, RecordType::Txt, values, options)
    }

    /// A and AAAA records pointing to a selection of servers.
    fn a_aaaa<'s>(
        &mut self,
        name: &str,
        servers: impl IntoIterator<Item = &'s Server>,
        options: RecordOptions,
    ) -> Result<&mut Self> {
        bundles::address_records(self, name, servers, &options)?;
        Ok(self)
    }

    /// Mail hosted by Fastmail for the apex, `*` and `subdomains`.
    fn fastmail_mx(&mut self, subdomains: &[&str]) -> Result<&mut Self> {
        self.mail_hosting(subdomains)?;
        Ok(self)
    }

    /// Fastmail client service records.
    fn fastmail_services(&mut self) -> Result<&mut Self> {
        self.mail_services()?;
        Ok(self)
    }

    /// Web name served by the `web` servers.
    fn www(&mut self, name: &str, servers: &[Server]) -> Result<&mut Self> {
        self.www_with(name, servers, &RecordOptions::default())
    }

    /// Web name with explicit options. The address TTL stays the web TTL.
    fn www_with(
        &mut self,
        name: &str,
        servers: &[Server],
        options: &RecordOptions,
    ) -> Result<&mut Self> {
        self.web_hosting(name, servers, options)?;
        Ok(self)
    }

    /// A and AAAA records for every server named under this zone.
    fn servers(&mut self, servers: &[Server]) -> Result<&mut Self> {
        self.servers_with(servers, &RecordOptions::default())
    }

    /// Server names with explicit options.
    fn servers_with(&mut self, servers: &[Server], options: &RecordOptions) -> Result<&mut Self> {
        self.server_names(servers, options)?;
        Ok(self)
    }

    /// Delegate `label` to a child zone: NS, and DS once the child is signed.
    fn delegate(&mut self, label: &str, child: &ZoneSummary) -> Result<&mut Self> {
        self.ns(label, child.nameservers.fqdn_values())?;
        if let Some(ds) = &child.ds_record {
            self.ds(label, ds)?;
        }
        Ok(self)
    }
}

impl<Z: Zone + ?Sized> ZoneExt for Z {}

/// Validate a zone name as written in declarations (`luffy.cx`).
pub(crate) fn parse_zone_name(name: &str) -> Result<Name> {
    let invalid = |reason: String| ZoneError::InvalidZoneName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("empty name".into()));
    }
    if name.ends_with('.') {
        return Err(invalid("zone names are written without a trailing dot".into()));
    }
    let parsed = Name::from_ascii(name).map_err(|e| invalid(e.to_string()))?;
    if parsed.num_labels() < 2 {
        return Err(invalid("a zone needs at least two labels".into()));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zone_name() {
        assert_eq!(parse_zone_name("luffy.cx").unwrap().num_labels(), 2);
        assert_eq!(parse_zone_name("acme.luffy.cx").unwrap().num_labels(), 3);
    }

    #[test]
    fn test_parse_zone_name_rejects() {
        for name in ["", "luffy.cx.", "localhost"] {
            assert!(
                matches!(parse_zone_name(name), Err(ZoneError::InvalidZoneName { .. })),
                "{name:?} should be rejected"
            );
        }
    }
}
