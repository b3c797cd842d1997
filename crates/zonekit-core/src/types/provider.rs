use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Result, ZoneError};

/// Provider plugin a resource is managed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Amazon Web Services (Route53, KMS, IAM)
    Aws,
    /// Gandi (LiveDNS and registrar)
    Gandi,
}

impl ProviderKind {
    /// Provider type name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Gandi => "gandi",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured provider instance
///
/// Credentials are never stored here; `settings` only carries non-secret
/// configuration such as the AWS region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Provider plugin
    pub kind: ProviderKind,
    /// Alias distinguishing several instances of the same plugin
    pub alias: String,
    /// Extra provider block settings
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl Provider {
    /// Create a provider instance without settings
    #[must_use]
    pub fn new(kind: ProviderKind, alias: impl Into<String>) -> Self {
        Self {
            kind,
            alias: alias.into(),
            settings: BTreeMap::new(),
        }
    }

    /// Shorthand for an AWS provider
    #[must_use]
    pub fn aws(alias: impl Into<String>) -> Self {
        Self::new(ProviderKind::Aws, alias)
    }

    /// Shorthand for a Gandi provider
    #[must_use]
    pub fn gandi(alias: impl Into<String>) -> Self {
        Self::new(ProviderKind::Gandi, alias)
    }

    /// Add a provider block setting
    #[must_use]
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Reference used in a resource's `provider` argument (`gandi.vb`)
    #[must_use]
    pub fn reference(&self) -> String {
        format!("{}.{}", self.kind, self.alias)
    }

    /// Fail unless this provider is of `kind`
    pub fn expect(&self, kind: ProviderKind) -> Result<&Self> {
        if self.kind == kind {
            Ok(self)
        } else {
            Err(ZoneError::ProviderMismatch {
                expected: kind.to_string(),
                found: self.reference(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_reference() {
        assert_eq!(Provider::gandi("vb").reference(), "gandi.vb");
        assert_eq!(Provider::aws("main").reference(), "aws.main");
    }

    #[test]
    fn expect_rejects_other_kind() {
        let aws = Provider::aws("main");
        assert!(aws.expect(ProviderKind::Aws).is_ok());
        let err = aws.expect(ProviderKind::Gandi).unwrap_err();
        assert!(matches!(
            err,
            ZoneError::ProviderMismatch { ref expected, ref found }
                if expected == "gandi" && found == "aws.main"
        ));
    }
}
