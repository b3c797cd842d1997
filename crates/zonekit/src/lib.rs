//! zonekit: declare DNS zones once, materialize them on several backends.
//!
//! Zones are described through one protocol ([`Zone`]) and translated into
//! provider resources by two backends:
//! - [`LiveDnsZone`] - registrar-hosted zone, flat values, quoted TXT
//! - [`Route53Zone`] - hosted zone with geolocation routing and KMS-backed signing
//!
//! # Architecture
//!
//! - `zone` - the protocol, record bundles (mail, web, server names), the
//!   fan-out composite and the signing/registration workflow
//! - `graph` - declared resources, logical ids and Terraform JSON synthesis
//! - `deployment` - TOML-described orchestration of providers, zones and groups
//!
//! Nothing here talks to a provider: the output is a resource graph that an
//! external engine plans and applies.
//!
//! # Example
//!
//! ```rust
//! use zonekit::{HostedZone, LiveDnsZone, Provider, ZoneDefaults, ZoneExt};
//!
//! let gandi = Provider::gandi("vb");
//! let mut zone = LiveDnsZone::new("luffy.cx", &gandi, ZoneDefaults::new("luffy.cx"))?.sign()?;
//! zone.registrar(&gandi, true)?
//!     .fastmail_mx(&[])?
//!     .cname("eizo", "eizo.y.luffy.cx.")?;
//! # Ok::<(), zonekit::ZoneError>(())
//! ```

pub mod config;
pub mod deployment;
pub mod graph;
pub mod ttl_policy;
pub mod zone;

// Re-exports for convenience.
pub use config::ZoneDefaults;
pub use deployment::Deployment;
pub use graph::{PublishedRecord, Resource, ResourceKind, ResourceSet, Stack};
pub use zone::geo::{partition, GeoBucket};
pub use zone::livedns::LiveDnsZone;
pub use zone::multi::MultiZone;
pub use zone::route53::Route53Zone;
pub use zone::signing::{HostedZone, Signed, SigningState, Unsigned};
pub use zone::{Zone, ZoneExt};
pub use zonekit_core::*;
