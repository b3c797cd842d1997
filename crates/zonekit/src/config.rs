//! Zone-wide defaults resolved once per record.

use serde::{Deserialize, Serialize};

use crate::ttl_policy;

/// Defaults shared by every record of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDefaults {
    /// TTL for records that do not set one (default: 86400).
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// TTL forced on web-hosting address records (default: 7200).
    #[serde(default = "default_web_ttl")]
    pub web_ttl: u32,

    /// Domain under which `acme.<acme_root>` receives delegated ACME
    /// DNS-01 challenges.
    pub acme_root: String,
}

impl ZoneDefaults {
    /// Defaults with the standard TTLs and the given ACME root domain.
    #[must_use]
    pub fn new(acme_root: impl Into<String>) -> Self {
        Self {
            default_ttl: default_ttl(),
            web_ttl: default_web_ttl(),
            acme_root: acme_root.into(),
        }
    }

    /// Override the default TTL.
    #[must_use]
    pub const fn with_default_ttl(mut self, ttl: u32) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Override the web TTL.
    #[must_use]
    pub const fn with_web_ttl(mut self, ttl: u32) -> Self {
        self.web_ttl = ttl;
        self
    }

    /// Zone receiving ACME challenges, `acme.<acme_root>`.
    #[must_use]
    pub fn acme_zone(&self) -> String {
        format!("acme.{}", self.acme_root)
    }
}

// Default value functions for serde.
const fn default_ttl() -> u32 {
    ttl_policy::DEFAULT_TTL
}

const fn default_web_ttl() -> u32 {
    ttl_policy::WEB_TTL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let defaults = ZoneDefaults::new("luffy.cx");
        assert_eq!(defaults.default_ttl, 86400);
        assert_eq!(defaults.web_ttl, 7200);
        assert_eq!(defaults.acme_zone(), "acme.luffy.cx");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let defaults: ZoneDefaults = toml::from_str(r#"acme_root = "example.org""#).unwrap();
        assert_eq!(defaults, ZoneDefaults::new("example.org"));

        let defaults: ZoneDefaults =
            toml::from_str("acme_root = \"example.org\"\ndefault_ttl = 3600").unwrap();
        assert_eq!(defaults.default_ttl, 3600);
        assert_eq!(defaults.web_ttl, 7200);
    }

    #[test]
    fn test_acme_root_is_required() {
        assert!(toml::from_str::<ZoneDefaults>("default_ttl = 60").is_err());
    }
}
