//! TTL policy constants for published records.
//!
//! Most records change rarely and keep a one-day TTL. Addresses of web
//! names move when servers are rotated, so they are cached for a shorter
//! time.

/// TTL applied when a record does not set one.
pub const DEFAULT_TTL: u32 = 86400;

/// TTL for A/AAAA records created by the web-hosting bundle.
pub const WEB_TTL: u32 = 60 * 60 * 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_values_are_reasonable() {
        // Web addresses must expire before everything else.
        assert!(WEB_TTL < DEFAULT_TTL);
        assert_eq!(WEB_TTL, 7200);
        assert_eq!(DEFAULT_TTL, 86400);
    }
}
