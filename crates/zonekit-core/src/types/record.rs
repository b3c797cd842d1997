use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ZoneError;

/// Record name denoting the zone apex
pub const APEX: &str = "@";

/// Record types a zone may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Certification authority authorization
    Caa,
    /// Canonical name
    Cname,
    /// Delegation signer
    Ds,
    /// Mail exchange
    Mx,
    /// Name server
    Ns,
    /// Service locator
    Srv,
    /// Text
    Txt,
}

impl RecordType {
    /// Every supported record type
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::Aaaa,
        Self::Caa,
        Self::Cname,
        Self::Ds,
        Self::Mx,
        Self::Ns,
        Self::Srv,
        Self::Txt,
    ];

    /// Wire name of the type (`"AAAA"`, `"TXT"`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Ds => "DS",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ZoneError::InvalidRecordType(s.to_string()))
    }
}

/// Ordered value set of a record
///
/// A scalar converts to a one-element set. A set may also be a single
/// list-valued expression that only the provisioning engine can resolve,
/// such as the name servers of a zone created in the same plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ValuesRepr")]
pub enum Values {
    /// Literal values
    List(Vec<String>),
    /// Expression evaluating to the whole list
    Expression(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValuesRepr {
    One(String),
    Many(Vec<String>),
}

impl From<ValuesRepr> for Values {
    fn from(repr: ValuesRepr) -> Self {
        match repr {
            ValuesRepr::One(v) => Self::List(vec![v]),
            ValuesRepr::Many(v) => Self::List(v),
        }
    }
}

impl Serialize for Values {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::List(values) => values.serialize(serializer),
            Self::Expression(expr) => expr.serialize(serializer),
        }
    }
}

impl Default for Values {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Values {
    /// List-valued `${...}` interpolation
    #[must_use]
    pub fn expression(expr: impl Into<String>) -> Self {
        Self::Expression(expr.into())
    }

    /// Number of literal values; an expression counts as one
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the set holds no value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns true for an engine-resolved expression
    #[must_use]
    pub const fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }

    /// Iterate over the values in order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.as_slice().iter()
    }

    /// Borrow the values as a slice; an expression is its only element
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::List(values) => values,
            Self::Expression(expr) => std::slice::from_ref(expr),
        }
    }

    /// Apply `f` to every literal value; expressions are left alone
    #[must_use]
    pub fn map(self, f: impl Fn(String) -> String) -> Self {
        match self {
            Self::List(values) => Self::List(values.into_iter().map(f).collect()),
            expr @ Self::Expression(_) => expr,
        }
    }

    /// Attribute value: an array of literals, or the bare expression string
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::List(values) => serde_json::json!(values),
            Self::Expression(expr) => serde_json::Value::String(expr.clone()),
        }
    }
}

impl From<&str> for Values {
    fn from(s: &str) -> Self {
        Self::List(vec![s.to_string()])
    }
}

impl From<String> for Values {
    fn from(s: String) -> Self {
        Self::List(vec![s])
    }
}

impl From<&String> for Values {
    fn from(s: &String) -> Self {
        Self::List(vec![s.clone()])
    }
}

impl From<Vec<String>> for Values {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<Vec<&str>> for Values {
    fn from(v: Vec<&str>) -> Self {
        Self::List(v.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Values {
    fn from(v: &[&str]) -> Self {
        Self::List(v.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Values {
    fn from(v: [&str; N]) -> Self {
        Self::List(v.iter().map(|s| (*s).to_string()).collect())
    }
}

impl FromIterator<String> for Values {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Geolocation scope understood by geolocation-aware backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoScope {
    /// Continent code (`EU`, `NA`, ...)
    Continent,
    /// ISO 3166-1 country code, or `*` for the default answer
    Country,
    /// Country subdivision code
    Subdivision,
}

impl GeoScope {
    /// Every recognized scope, in tag-matching order
    pub const ALL: [Self; 3] = [Self::Continent, Self::Country, Self::Subdivision];

    /// Tag prefix for this scope
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continent => "continent",
            Self::Country => "country",
            Self::Subdivision => "subdivision",
        }
    }

    /// Scope whose prefix is exactly `prefix`
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == prefix)
    }
}

impl std::fmt::Display for GeoScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geolocation predicate: `scope` equals `value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Which geolocation field is matched
    pub scope: GeoScope,
    /// Matched code
    pub value: String,
}

impl GeoLocation {
    /// Create a predicate
    #[must_use]
    pub fn new(scope: GeoScope, value: impl Into<String>) -> Self {
        Self {
            scope,
            value: value.into(),
        }
    }

    /// Catch-all predicate answering when nothing more specific matches
    #[must_use]
    pub fn default_answer() -> Self {
        Self::new(GeoScope::Country, "*")
    }

    /// Bucket key, `<scope>:<value>`
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.scope, self.value)
    }

    /// Set identifier for records answering this predicate
    #[must_use]
    pub fn set_identifier(&self) -> String {
        format!("geo-{}-{}", self.scope, self.value)
    }
}

/// Backend routing metadata attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSelector {
    /// Distinguishes records sharing a name and type
    pub set_identifier: String,
    /// When this record answers
    pub geolocation: GeoLocation,
}

impl From<GeoLocation> for RoutingSelector {
    fn from(geolocation: GeoLocation) -> Self {
        Self {
            set_identifier: geolocation.set_identifier(),
            geolocation,
        }
    }
}

/// Per-record options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOptions {
    /// TTL in seconds; the zone default applies when unset
    #[serde(default)]
    pub ttl: Option<u32>,

    /// Routing selector for backends that support one
    #[serde(default)]
    pub routing: Option<RoutingSelector>,
}

impl RecordOptions {
    /// Set the TTL
    #[must_use]
    pub const fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the routing selector
    #[must_use]
    pub fn routing(mut self, routing: impl Into<RoutingSelector>) -> Self {
        self.routing = Some(routing.into());
        self
    }
}

/// A record as requested through the zone protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Relative name, or `@` for the apex
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Values in order
    pub values: Values,

    /// TTL and routing
    #[serde(default, flatten)]
    pub options: RecordOptions,
}

impl Record {
    /// Create a record with default options
    #[must_use]
    pub fn new(name: impl Into<String>, record_type: RecordType, values: impl Into<Values>) -> Self {
        Self {
            name: name.into(),
            record_type,
            values: values.into(),
            options: RecordOptions::default(),
        }
    }

    /// Replace the options
    #[must_use]
    pub fn with_options(mut self, options: RecordOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns true if the record sits at the zone apex
    #[must_use]
    pub fn is_apex(&self) -> bool {
        self.name == APEX
    }

    /// TTL to publish, falling back to `default_ttl`
    #[must_use]
    pub fn ttl_or(&self, default_ttl: u32) -> u32 {
        self.options.ttl.unwrap_or(default_ttl)
    }
}
