//! State shared by the backend zones: identity, provider and resources.

use zonekit_core::{Provider, ProviderKind, Result};

use super::parse_zone_name;
use crate::config::ZoneDefaults;
use crate::graph::{Resource, ResourceKind, ResourceSet};

/// Construct scope of one backend zone.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    pub name: String,
    pub path: String,
    pub provider: Provider,
    pub defaults: ZoneDefaults,
    pub resources: ResourceSet,
}

impl Scope {
    /// Validate the zone name and the provider, then open the scope
    /// `<prefix>-<name>`.
    pub fn new(
        prefix: &str,
        name: &str,
        provider: &Provider,
        kind: ProviderKind,
        defaults: ZoneDefaults,
    ) -> Result<Self> {
        parse_zone_name(name)?;
        provider.expect(kind)?;
        Ok(Self {
            name: name.to_string(),
            path: format!("{prefix}-{name}"),
            provider: provider.clone(),
            defaults,
            resources: ResourceSet::new(),
        })
    }

    /// New resource under this scope, bound to the zone's provider.
    pub fn resource(&self, kind: ResourceKind, id: &str) -> Result<Resource> {
        self.resource_with(kind, id, &self.provider)
    }

    /// New resource under this scope, bound to another provider.
    pub fn resource_with(&self, kind: ResourceKind, id: &str, provider: &Provider) -> Result<Resource> {
        Ok(Resource::new(kind, format!("{}/{id}", self.path), provider)?.in_zone(&self.name))
    }
}
