use thiserror::Error;

/// Result type alias for zone graph construction
pub type Result<T> = std::result::Result<T, ZoneError>;

/// Errors that abort construction of a zone graph
#[derive(Error, Debug)]
pub enum ZoneError {
    /// `registrar` asked for DNSSEC on a zone that was never signed
    #[error("{zone} was not signed")]
    NotSigned {
        /// Name of the offending zone
        zone: String,
    },

    /// Record type outside the supported enumeration
    #[error("invalid record type: {0}")]
    InvalidRecordType(String),

    /// A geolocation tag names a known scope but carries no value
    #[error("malformed geolocation tag {tag:?} on server {server}")]
    MalformedGeoTag {
        /// Server carrying the tag
        server: String,
        /// The tag as written
        tag: String,
    },

    /// A routing selector was sent to a backend without geolocation routing
    #[error("zone {zone} does not support routing selectors")]
    UnsupportedRouting {
        /// Name of the zone that rejected the record
        zone: String,
    },

    /// Two resources were declared under the same path
    #[error("duplicate resource: {path}")]
    DuplicateResource {
        /// Construct path of the resource
        path: String,
    },

    /// A fan-out group was created without any member zone
    #[error("a fan-out group needs at least one zone")]
    EmptyFanOut,

    /// Zone name is not a valid DNS name
    #[error("invalid zone name {name:?}: {reason}")]
    InvalidZoneName {
        /// Name as given
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A resource was bound to a provider of the wrong kind
    #[error("provider mismatch: expected {expected} provider, got {found}")]
    ProviderMismatch {
        /// Provider kind the backend needs
        expected: String,
        /// Provider reference that was supplied
        found: String,
    },

    /// Deployment description is invalid or references unknown entities
    #[error("deployment error: {0}")]
    Deployment(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ZoneError {
    /// Returns true if the error comes from a violated workflow precondition
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::NotSigned { .. } | Self::EmptyFanOut)
    }

    /// Name of the zone the error is about, when there is one
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        match self {
            Self::NotSigned { zone } | Self::UnsupportedRouting { zone } => Some(zone),
            Self::InvalidZoneName { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_signed_names_the_zone() {
        let err = ZoneError::NotSigned {
            zone: "bernat.ch".into(),
        };
        assert_eq!(err.to_string(), "bernat.ch was not signed");
        assert!(err.is_precondition());
        assert_eq!(err.zone(), Some("bernat.ch"));
    }

    #[test]
    fn duplicate_is_not_a_precondition() {
        let err = ZoneError::DuplicateResource {
            path: "G-luffy.cx/TXT-@".into(),
        };
        assert!(!err.is_precondition());
        assert_eq!(err.zone(), None);
    }
}
