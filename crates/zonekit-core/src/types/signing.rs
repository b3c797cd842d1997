use serde::{Deserialize, Serialize};

use super::Values;

/// Reference to an attribute computed by the provisioning engine
///
/// Renders as a Terraform interpolation, `${<address>.<attribute>}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttrRef {
    /// Resource address (`aws_route53_zone.R53-bernat_ch_zone_1a2b3c4d`)
    pub address: String,
    /// Attribute name (`name_servers`)
    pub attribute: String,
}

impl AttrRef {
    /// Create a reference
    #[must_use]
    pub fn new(address: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            attribute: attribute.into(),
        }
    }

    /// Bare expression, without the interpolation wrapper
    #[must_use]
    pub fn expression(&self) -> String {
        format!("{}.{}", self.address, self.attribute)
    }

    /// Interpolation string usable as an attribute value
    #[must_use]
    pub fn interpolate(&self) -> String {
        format!("${{{}}}", self.expression())
    }
}

impl std::fmt::Display for AttrRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.interpolate())
    }
}

/// DNSSEC key-signing key of a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey {
    /// Public key material
    pub public_key: String,
    /// Backend-specific algorithm code
    pub algorithm: String,
    /// DS record text for the parent zone
    pub ds_record: String,
}

/// Opaque handle to an external KMS key usable for zone signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKeyHandle {
    /// ARN (or ARN reference) of the asymmetric signing key
    pub key_arn: String,
}

impl SigningKeyHandle {
    /// Wrap a key ARN
    #[must_use]
    pub fn new(key_arn: impl Into<String>) -> Self {
        Self {
            key_arn: key_arn.into(),
        }
    }
}

impl From<AttrRef> for SigningKeyHandle {
    fn from(reference: AttrRef) -> Self {
        Self::new(reference.interpolate())
    }
}

/// Nameservers a zone is served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nameservers {
    /// Known host names
    Static(Vec<String>),
    /// List attribute resolved by the provisioning engine
    Reference(AttrRef),
}

impl Nameservers {
    /// Value for list-typed resource attributes
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Static(hosts) => serde_json::json!(hosts),
            Self::Reference(r) => serde_json::Value::String(r.interpolate()),
        }
    }

    /// NS record values: every host name with a trailing dot
    ///
    /// A reference stays one list expression, never a list holding it.
    #[must_use]
    pub fn fqdn_values(&self) -> Values {
        match self {
            Self::Static(hosts) => hosts
                .iter()
                .map(|h| {
                    if h.ends_with('.') {
                        h.clone()
                    } else {
                        format!("{h}.")
                    }
                })
                .collect(),
            Self::Reference(r) => {
                Values::expression(format!("${{formatlist(\"%s.\", {})}}", r.expression()))
            }
        }
    }
}

/// What a parent zone needs to delegate to a child zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSummary {
    /// Child zone name
    pub zone: String,
    /// Nameservers serving the child
    pub nameservers: Nameservers,
    /// DS record, present once the child is signed
    pub ds_record: Option<String>,
}
