//! Core types for zonekit.
//!
//! This crate provides the value types shared by every zone backend:
//!
//! - **Records**: the closed [`RecordType`] enumeration, value sets, TTL and
//!   geolocation routing options
//! - **Servers**: the read-only server snapshot consumed from the compute layer
//! - **Signing**: DNSSEC key material, signing-key handles and zone summaries
//! - **Errors**: every failure of graph construction, as [`ZoneError`]
//!
//! # Example
//!
//! ```rust
//! use zonekit_core::{Record, RecordType};
//!
//! let record = Record::new("@", RecordType::Txt, "v=spf1 -all");
//! assert_eq!(record.values.len(), 1);
//! ```

mod error;
pub mod types;

pub use error::{Result, ZoneError};
pub use types::*;
