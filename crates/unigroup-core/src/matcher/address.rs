// ── IP rule patterns ──
//
//   "192.168.1.0/24"               CIDR (host bits allowed)
//   "192.168.1.100-200"            last-octet range
//   "192.168.1.100-192.168.1.200"  full range
//   "192.168.1.*"                  anything else goes to `Pattern`
// Ranges compare IPv4 addresses as u32. Unparseable specs match nothing.

use std::net::{IpAddr, Ipv4Addr};

use ipnet::IpNet;

use super::pattern::Pattern;

/// A compiled IP address pattern.
#[derive(Debug, Clone)]
pub enum AddressPattern {
    Never,
    Network(IpNet),
    /// Inclusive IPv4 range.
    Range { start: u32, end: u32 },
    /// Exact or wildcard text match.
    Text(Pattern),
}

impl AddressPattern {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Never;
        }

        if raw.contains('/') {
            return raw.parse::<IpNet>().map_or(Self::Never, Self::Network);
        }

        if raw.contains('-') && !raw.starts_with('-') {
            return parse_range(raw).map_or(Self::Never, |(start, end)| Self::Range { start, end });
        }

        Self::Text(Pattern::parse(raw))
    }

    /// Test a candidate address. Absent or empty addresses never match.
    pub fn matches(&self, address: Option<&str>) -> bool {
        let Some(address) = address.filter(|a| !a.is_empty()) else {
            return false;
        };

        match self {
            Self::Never => false,
            Self::Network(net) => address
                .parse::<IpAddr>()
                .is_ok_and(|ip| net.contains(&ip)),
            Self::Range { start, end } => address
                .parse::<Ipv4Addr>()
                .map(u32::from)
                .is_ok_and(|ip| (*start..=*end).contains(&ip)),
            Self::Text(pattern) => pattern.matches(Some(address)),
        }
    }
}

/// One-shot address test: parse `pattern` and match it against `address`.
pub fn ip_matches(pattern: &str, address: Option<&str>) -> bool {
    AddressPattern::parse(pattern).matches(address)
}

/// Split on the last `-`. A dotted right side is a full address; otherwise
/// it replaces the last octet of the left side.
fn parse_range(raw: &str) -> Option<(u32, u32)> {
    let (base, tail) = raw.rsplit_once('-')?;
    let start: Ipv4Addr = base.parse().ok()?;

    let end: Ipv4Addr = if tail.contains('.') {
        tail.parse().ok()?
    } else {
        let (prefix, _) = base.rsplit_once('.')?;
        format!("{prefix}.{tail}").parse().ok()?
    };

    Some((u32::from(start), u32::from(end)))
}
