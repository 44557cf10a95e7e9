//! Target enumeration
//!
//! Produces the ordered list of device addresses a run will back up. Pure
//! generation from explicit bounds; no discovery, no reachability checks.

use std::fmt;

/// One network address to be backed up
///
/// Immutable once enumerated; not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceTarget(String);

impl DeviceTarget {
    pub fn new(address: impl Into<String>) -> Self {
        DeviceTarget(address.into())
    }

    /// The device address in string form (dotted-quad for IPv4 targets)
    pub fn address(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate the ordered, contiguous device range `first_host..=last_host`
/// within the given /24 prefix.
///
/// Deterministic and infallible given valid bounds; returns an empty list
/// when `first_host > last_host`.
pub fn enumerate_targets(prefix: &str, first_host: u8, last_host: u8) -> Vec<DeviceTarget> {
    (first_host..=last_host)
        .map(|host| DeviceTarget(format!("{prefix}{host}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FIRST_HOST, LAST_HOST, SUBNET_PREFIX};

    #[test]
    fn default_range_covers_first_hundred_hosts() {
        let targets = enumerate_targets(SUBNET_PREFIX, FIRST_HOST, LAST_HOST);
        assert_eq!(targets.len(), 100);
        assert_eq!(targets[0].address(), "10.2.11.1");
        assert_eq!(targets[99].address(), "10.2.11.100");
    }

    #[test]
    fn targets_share_prefix_and_strictly_increase() {
        let targets = enumerate_targets(SUBNET_PREFIX, FIRST_HOST, LAST_HOST);
        let mut previous = 0u8;
        for target in &targets {
            let host = target
                .address()
                .strip_prefix(SUBNET_PREFIX)
                .expect("target outside subnet prefix")
                .parse::<u8>()
                .expect("host octet not numeric");
            assert!(host > previous);
            previous = host;
        }
    }

    #[test]
    fn custom_bounds_are_honored() {
        let targets = enumerate_targets("192.168.1.", 10, 12);
        let addresses: Vec<&str> = targets.iter().map(DeviceTarget::address).collect();
        assert_eq!(addresses, vec!["192.168.1.10", "192.168.1.11", "192.168.1.12"]);
    }

    #[test]
    fn inverted_bounds_yield_empty_range() {
        assert!(enumerate_targets(SUBNET_PREFIX, 5, 4).is_empty());
    }
}
