// ── Client records ──
//
// The engine never owns a client schema. Callers fetch clients however
// they like and expose the handful of fields rules look at through
// `ClientView`. `ClientRecord` is the open, JSON-backed implementation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Derived connection type used by `conn_type` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConnectionType {
    Wired,
    Wireless,
}

/// Read-only view of the client fields auto-group rules match against.
pub trait ClientView {
    /// Hardware address, in whatever format the source reports.
    fn mac(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
    fn hostname(&self) -> Option<&str>;
    /// Vendor or OUI manufacturer string.
    fn vendor(&self) -> Option<&str>;
    /// SSID for wireless clients.
    fn ssid(&self) -> Option<&str>;
    /// Network name (wired or wireless).
    fn network_name(&self) -> Option<&str>;
    fn ip(&self) -> Option<&str>;
    fn is_wired(&self) -> bool;

    /// Display name, falling back to hostname when the name is absent or empty.
    fn display_name(&self) -> Option<&str> {
        non_empty(self.name()).or_else(|| self.hostname())
    }

    /// SSID, falling back to the network name.
    fn network(&self) -> Option<&str> {
        non_empty(self.ssid()).or_else(|| self.network_name())
    }

    fn connection_type(&self) -> ConnectionType {
        if self.is_wired() {
            ConnectionType::Wired
        } else {
            ConnectionType::Wireless
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// An already-fetched client as an open bag of JSON fields.
///
/// Field names follow the controller's client payloads: `mac`, `name`,
/// `hostname`, `oui` (or `vendor`), `essid`, `network`, `ip`, `is_wired`.
/// Everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientRecord(Map<String, Value>);

impl ClientRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// String value of `key`; non-string values read as absent.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for ClientRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl ClientView for ClientRecord {
    fn mac(&self) -> Option<&str> {
        self.str_field("mac")
    }

    fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    fn hostname(&self) -> Option<&str> {
        self.str_field("hostname")
    }

    fn vendor(&self) -> Option<&str> {
        self.str_field("oui").or_else(|| self.str_field("vendor"))
    }

    fn ssid(&self) -> Option<&str> {
        self.str_field("essid")
    }

    fn network_name(&self) -> Option<&str> {
        self.str_field("network")
    }

    fn ip(&self) -> Option<&str> {
        self.str_field("ip")
    }

    fn is_wired(&self) -> bool {
        self.0
            .get("is_wired")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
