//! Geolocation partitioning of a server collection.
//!
//! Servers tagged `continent:EU`, `country:FR` or `subdivision:US-CA` are
//! grouped into one bucket per tag. A `country:*` bucket holding every input
//! server always comes first: it is the answer for clients no other bucket
//! matches. A server lands in every bucket its tags name, so overlapping
//! buckets are resolved by the backend's own geolocation precedence.

use tracing::debug;
use zonekit_core::{GeoLocation, GeoScope, Result, Server, ZoneError};

/// Servers answering for one geolocation predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoBucket<'a> {
    /// When this bucket answers
    pub location: GeoLocation,
    /// Servers in input order
    pub servers: Vec<&'a Server>,
}

impl<'a> GeoBucket<'a> {
    fn new(location: GeoLocation) -> Self {
        Self {
            location,
            servers: Vec::new(),
        }
    }

    fn add(&mut self, server: &'a Server) {
        if !self.servers.iter().any(|s| std::ptr::eq(*s, server)) {
            self.servers.push(server);
        }
    }
}

/// Parse a geolocation tag.
///
/// Returns `None` for tags outside the recognized scopes (`web`,
/// `countryside`), and an error for a recognized scope without a value.
pub fn parse_tag(server: &Server, tag: &str) -> Result<Option<GeoLocation>> {
    let (prefix, value) = tag.split_once(':').unwrap_or((tag, ""));
    let Some(scope) = GeoScope::from_prefix(prefix) else {
        return Ok(None);
    };
    if value.is_empty() {
        return Err(ZoneError::MalformedGeoTag {
            server: server.name.clone(),
            tag: tag.to_string(),
        });
    }
    Ok(Some(GeoLocation::new(scope, value)))
}

/// Partition `servers` by geolocation tag.
///
/// Buckets come in order of first appearance, after the default bucket.
pub fn partition<'a>(servers: &[&'a Server]) -> Result<Vec<GeoBucket<'a>>> {
    let mut buckets = vec![GeoBucket {
        location: GeoLocation::default_answer(),
        servers: servers.to_vec(),
    }];
    for &server in servers {
        for tag in &server.tags {
            let Some(location) = parse_tag(server, tag)? else {
                continue;
            };
            let index = match buckets.iter().position(|b| b.location == location) {
                Some(index) => index,
                None => {
                    buckets.push(GeoBucket::new(location));
                    buckets.len() - 1
                }
            };
            buckets[index].add(server);
        }
    }
    debug!(
        servers = servers.len(),
        buckets = buckets.len(),
        "partitioned servers by geolocation"
    );
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(buckets: &[GeoBucket<'_>]) -> Vec<String> {
        buckets.iter().map(|b| b.location.key()).collect()
    }

    fn names<'a>(bucket: &GeoBucket<'a>) -> Vec<&'a str> {
        bucket.servers.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_default_bucket_is_whole_input() {
        let servers = [
            Server::new("web03").tag("web").tag("continent:EU"),
            Server::new("web04").tag("web"),
            Server::new("web05").tag("country:US").tag("subdivision:US-CA"),
        ];
        let refs: Vec<&Server> = servers.iter().collect();
        let buckets = partition(&refs).unwrap();

        assert_eq!(buckets[0].location, GeoLocation::default_answer());
        assert_eq!(names(&buckets[0]), ["web03", "web04", "web05"]);
        assert_eq!(
            keys(&buckets),
            ["country:*", "continent:EU", "country:US", "subdivision:US-CA"]
        );
    }

    #[test]
    fn test_default_bucket_for_empty_input() {
        let buckets = partition(&[]).unwrap();
        assert_eq!(buckets.len(), 1);
        assert!(buckets[0].servers.is_empty());
    }

    #[test]
    fn test_server_in_three_buckets() {
        let fr = Server::new("web03").tag("continent:EU").tag("country:FR");
        let fi = Server::new("web04").tag("continent:EU").tag("country:FI");
        let buckets = partition(&[&fr, &fi]).unwrap();

        let holding: Vec<String> = buckets
            .iter()
            .filter(|b| b.servers.iter().any(|s| std::ptr::eq(*s, &fr)))
            .map(|b| b.location.key())
            .collect();
        assert_eq!(holding, ["country:*", "continent:EU", "country:FR"]);
        let eu = buckets.iter().find(|b| b.location.key() == "continent:EU").unwrap();
        assert_eq!(names(eu), ["web03", "web04"]);
    }

    #[test]
    fn test_explicit_default_tag_does_not_duplicate() {
        let server = Server::new("web03").tag("country:*");
        let buckets = partition(&[&server]).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(names(&buckets[0]), ["web03"]);
    }

    #[test]
    fn test_unrecognized_prefix_ignored() {
        let server = Server::new("web03").tag("countryside:FR").tag("web").tag("region:eu");
        let buckets = partition(&[&server]).unwrap();
        assert_eq!(keys(&buckets), ["country:*"]);
    }

    #[test]
    fn test_malformed_tag() {
        for tag in ["country", "continent:"] {
            let server = Server::new("web03").tag(tag);
            let err = partition(&[&server]).unwrap_err();
            assert!(
                matches!(&err, ZoneError::MalformedGeoTag { server: s, tag: t } if s == "web03" && t == tag),
                "{tag}: {err}"
            );
        }
    }
}
