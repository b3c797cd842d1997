//! Signing state and the registrar workflow.
//!
//! A zone starts [`Unsigned`]; its backend's `sign` consumes it and returns
//! the same zone [`Signed`] with its key-signing key. Registration works in
//! both states, but publishing DNSSEC material needs the key, so asking an
//! unsigned zone for it fails before anything is declared.

use tracing::info;
use zonekit_core::{
    Nameservers, Provider, ProviderKind, Result, SigningKey, ZoneError, ZoneSummary,
};

use super::Zone;
use crate::graph::{Resource, ResourceKind, ResourceSet};

/// Signing state of a zone.
pub trait SigningState: std::fmt::Debug {
    /// Key-signing key, once signed.
    fn key(&self) -> Option<&SigningKey>;
}

/// Zone without a key-signing key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unsigned;

impl SigningState for Unsigned {
    fn key(&self) -> Option<&SigningKey> {
        None
    }
}

/// Zone signed with the wrapped key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signed(pub SigningKey);

impl SigningState for Signed {
    fn key(&self) -> Option<&SigningKey> {
        Some(&self.0)
    }
}

/// A zone that exists on its own (as opposed to a fan-out group) and can
/// be delegated to from a registrar or a parent zone.
pub trait HostedZone: Zone {
    /// Construct path of the zone (`G-luffy.cx`).
    fn path(&self) -> &str;

    /// Nameservers serving this zone.
    fn nameservers(&mut self) -> Result<Nameservers>;

    /// Key-signing key, if the zone was signed.
    fn signing_key(&self) -> Option<&SigningKey>;

    /// Resources declared so far.
    fn resources(&self) -> &ResourceSet;

    /// Mutable access to the declared resources.
    fn resources_mut(&mut self) -> &mut ResourceSet;

    /// Declare a resource.
    fn emit(&mut self, resource: Resource) -> Result<()> {
        self.resources_mut().push(resource).map(|_| ())
    }

    /// Hand the declared resources over, typically to a stack.
    fn take_resources(&mut self) -> Vec<Resource> {
        self.resources_mut().take()
    }

    /// Point the registrar at this zone's nameservers and, with `dnssec`,
    /// publish its key-signing key there.
    fn register(&mut self, registrar: &Provider, dnssec: bool) -> Result<()> {
        let key = if dnssec {
            let key = self.signing_key().cloned().ok_or_else(|| ZoneError::NotSigned {
                zone: self.name().to_string(),
            })?;
            Some(key)
        } else {
            None
        };
        registrar.expect(ProviderKind::Gandi)?;

        let nameservers = self.nameservers()?;
        let ns = Resource::new(
            ResourceKind::GandiNameservers,
            format!("{}/NS", self.path()),
            registrar,
        )?
        .in_zone(self.name())
        .attr("domain", self.name())
        .attr("nameservers", nameservers.to_value());
        self.emit(ns)?;

        if let Some(key) = key {
            let nssec = Resource::new(
                ResourceKind::GandiDnssecKey,
                format!("{}/NSSEC", self.path()),
                registrar,
            )?
            .in_zone(self.name())
            .attr("domain", self.name())
            .attr("algorithm", key.algorithm)
            .attr("public_key", key.public_key)
            .attr("type", "ksk");
            self.emit(nssec)?;
        }

        info!(
            zone = %self.name(),
            registrar = %registrar.reference(),
            dnssec,
            "registered zone"
        );
        Ok(())
    }

    /// Chainable [`register`](Self::register).
    fn registrar(&mut self, registrar: &Provider, dnssec: bool) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.register(registrar, dnssec)?;
        Ok(self)
    }

    /// What a parent zone needs to delegate here.
    fn summary(&mut self) -> Result<ZoneSummary> {
        Ok(ZoneSummary {
            zone: self.name().to_string(),
            nameservers: self.nameservers()?,
            ds_record: self.signing_key().map(|k| k.ds_record.clone()),
        })
    }
}
