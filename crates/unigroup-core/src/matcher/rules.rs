// ── Compiled auto-group rules ──
//
// Patterns are compiled once per evaluation pass instead of once per
// client. Categories AND together; patterns inside a category OR.

use super::address::AddressPattern;
use super::pattern::Pattern;
use crate::model::identity::{normalize_mac, normalize_mac_separators};
use crate::model::{AutoGroupRules, ClientView};

/// An [`AutoGroupRules`] set ready to be applied to many clients.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    vendor: Vec<Pattern>,
    name: Vec<Pattern>,
    hostname: Vec<Pattern>,
    network: Vec<Pattern>,
    ip: Vec<AddressPattern>,
    /// Uppercased, colon-separated prefixes.
    mac: Vec<String>,
    /// Lowercased `"wired"` / `"wireless"` entries.
    conn_type: Vec<String>,
}

impl CompiledRules {
    pub fn compile(rules: &AutoGroupRules) -> Self {
        Self {
            vendor: compile_patterns(&rules.vendor),
            name: compile_patterns(&rules.name),
            hostname: compile_patterns(&rules.hostname),
            network: compile_patterns(&rules.network),
            ip: rules.ip.iter().map(|p| AddressPattern::parse(p)).collect(),
            mac: rules
                .mac
                .iter()
                .map(|p| normalize_mac_separators(p))
                .collect(),
            conn_type: rules.conn_type.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// True if `client` satisfies every non-empty category.
    pub fn matches<C: ClientView + ?Sized>(&self, client: &C) -> bool {
        category(&self.vendor, |p| p.matches(client.vendor()))
            && category(&self.name, |p| p.matches(client.display_name()))
            && category(&self.hostname, |p| p.matches(client.hostname()))
            && category(&self.network, |p| p.matches(client.network()))
            && category(&self.ip, |p| p.matches(client.ip()))
            && self.mac_matches(client)
            && self.conn_type_matches(client)
    }

    /// Literal prefix test against the normalized client MAC. A missing MAC
    /// reads as empty, and an empty prefix matches anything.
    fn mac_matches<C: ClientView + ?Sized>(&self, client: &C) -> bool {
        if self.mac.is_empty() {
            return true;
        }
        let mac = client.mac().map(normalize_mac).unwrap_or_default();
        self.mac.iter().any(|prefix| mac.starts_with(prefix.as_str()))
    }

    fn conn_type_matches<C: ClientView + ?Sized>(&self, client: &C) -> bool {
        if self.conn_type.is_empty() {
            return true;
        }
        let actual = client.connection_type().to_string();
        self.conn_type.iter().any(|t| *t == actual)
    }
}

fn compile_patterns(list: &[String]) -> Vec<Pattern> {
    list.iter().map(|p| Pattern::parse(p)).collect()
}

fn category<T>(patterns: &[T], test: impl Fn(&T) -> bool) -> bool {
    patterns.is_empty() || patterns.iter().any(test)
}
