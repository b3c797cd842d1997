use serde::{Deserialize, Serialize};

/// Tag marking servers that serve web traffic
pub const WEB_TAG: &str = "web";

/// Server snapshot supplied by the compute provisioning layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Fully qualified host name (e.g. `web03.luffy.cx`)
    pub name: String,

    /// Public IPv4 address
    #[serde(default)]
    pub ipv4_address: Option<String>,

    /// Public IPv6 address
    #[serde(default)]
    pub ipv6_address: Option<String>,

    /// Hardware or instance type tag
    #[serde(default)]
    pub hardware: String,

    /// Free-form capability and geolocation tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Server is kept in inventory but must not receive traffic
    #[serde(default)]
    pub disabled: bool,
}

impl Server {
    /// Create a server with no address and no tag
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the IPv4 address
    #[must_use]
    pub fn ipv4(mut self, addr: impl Into<String>) -> Self {
        self.ipv4_address = Some(addr.into());
        self
    }

    /// Set the IPv6 address
    #[must_use]
    pub fn ipv6(mut self, addr: impl Into<String>) -> Self {
        self.ipv6_address = Some(addr.into());
        self
    }

    /// Set the hardware tag
    #[must_use]
    pub fn hardware(mut self, hardware: impl Into<String>) -> Self {
        self.hardware = hardware.into();
        self
    }

    /// Add a tag
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Mark the server disabled
    #[must_use]
    pub const fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Returns true if the server carries `tag`
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns true if the server should answer for web names
    #[must_use]
    pub fn serves_web(&self) -> bool {
        !self.disabled && self.has_tag(WEB_TAG)
    }
}

/// Servers tagged `tag`, in input order
pub fn tagged<'a>(servers: &'a [Server], tag: &'a str) -> impl Iterator<Item = &'a Server> + 'a {
    servers.iter().filter(move |s| s.has_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_compute_output() {
        let json = r#"[
            {"name": "web03.luffy.cx", "ipv4Address": "192.0.2.3",
             "ipv6Address": "2001:db8::3", "hardware": "cpx11",
             "tags": ["web", "continent:EU", "country:FI"]},
            {"name": "web05.luffy.cx", "hardware": "cpx11",
             "tags": ["web"], "disabled": true}
        ]"#;
        let servers: Vec<Server> = serde_json::from_str(json).unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].ipv4_address.as_deref(), Some("192.0.2.3"));
        assert!(servers[0].serves_web());
        assert!(!servers[1].serves_web());
        assert_eq!(servers[1].ipv6_address, None);
    }

    #[test]
    fn serves_web_requires_tag() {
        let server = Server::new("db01.luffy.cx").tag("isso");
        assert!(!server.serves_web());
        assert!(server.has_tag("isso"));
    }

    #[test]
    fn tagged_keeps_order() {
        let servers = vec![
            Server::new("a").tag("isso"),
            Server::new("b"),
            Server::new("c").tag("isso"),
        ];
        let names: Vec<_> = tagged(&servers, "isso").map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }
}
