// ── Group domain types ──
//
// On disk a group is a flat object with a `type` discriminator; in memory
// the static/auto split is a sum type so a static group can never carry
// rules and an auto group never carries a directly mutated member list.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Current version written to the groups document.
pub const DOCUMENT_VERSION: u32 = 1;

/// Discriminator for the two group kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GroupType {
    Static,
    Auto,
}

/// A member of a static group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Normalized MAC address (`AA:BB:CC:DD:EE:FF`).
    pub mac: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl GroupMember {
    /// True if `identifier` names this member by normalized MAC or literal alias.
    pub(crate) fn is_identified_by(&self, identifier: &str, identifier_mac: &str) -> bool {
        self.mac == identifier_mac || self.alias.as_deref() == Some(identifier)
    }
}

/// Matching rules for an auto group.
///
/// Each category is a list of patterns OR-combined within the category;
/// categories are AND-combined. An empty category places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoGroupRules {
    /// Vendor / OUI patterns.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub vendor: Vec<String>,
    /// Client display-name patterns.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub hostname: Vec<String>,
    /// Network / SSID patterns.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub network: Vec<String>,
    /// IP patterns: exact, wildcard, CIDR, or dash range.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub ip: Vec<String>,
    /// MAC prefixes (literal, not glob).
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub mac: Vec<String>,
    /// `"wired"` and/or `"wireless"`.
    #[serde(
        default,
        alias = "connection_type",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conn_type: Vec<String>,
}

impl AutoGroupRules {
    /// True when no category carries a pattern.
    pub fn is_empty(&self) -> bool {
        self.categories().all(|(_, patterns)| patterns.is_empty())
    }

    /// All seven categories in a fixed order, including empty ones.
    pub fn categories(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        [
            ("vendor", self.vendor.as_slice()),
            ("name", self.name.as_slice()),
            ("hostname", self.hostname.as_slice()),
            ("network", self.network.as_slice()),
            ("ip", self.ip.as_slice()),
            ("mac", self.mac.as_slice()),
            ("conn_type", self.conn_type.as_slice()),
        ]
        .into_iter()
    }
}

/// Kind-specific payload of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GroupKind {
    Static {
        #[serde(default, deserialize_with = "null_as_empty")]
        members: Vec<GroupMember>,
    },
    Auto {
        #[serde(default)]
        rules: Option<AutoGroupRules>,
    },
}

/// What kind of group `create_group` should produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NewGroupKind {
    /// Static group with an empty member list.
    #[default]
    Static,
    /// Auto group, optionally with rules already attached.
    Auto(Option<AutoGroupRules>),
}

impl From<AutoGroupRules> for NewGroupKind {
    fn from(rules: AutoGroupRules) -> Self {
        Self::Auto(Some(rules))
    }
}

/// A client group definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: GroupKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub(crate) fn new(
        name: &str,
        description: Option<String>,
        kind: NewGroupKind,
        now: DateTime<Utc>,
    ) -> Self {
        let kind = match kind {
            NewGroupKind::Static => GroupKind::Static {
                members: Vec::new(),
            },
            NewGroupKind::Auto(rules) => GroupKind::Auto { rules },
        };
        Self {
            name: name.to_owned(),
            description,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn group_type(&self) -> GroupType {
        match self.kind {
            GroupKind::Static { .. } => GroupType::Static,
            GroupKind::Auto { .. } => GroupType::Auto,
        }
    }

    /// Static member list, `None` for auto groups.
    pub fn members(&self) -> Option<&[GroupMember]> {
        match &self.kind {
            GroupKind::Static { members } => Some(members),
            GroupKind::Auto { .. } => None,
        }
    }

    /// Rule set, `None` for static groups and rule-less auto groups.
    pub fn rules(&self) -> Option<&AutoGroupRules> {
        match &self.kind {
            GroupKind::Auto { rules } => rules.as_ref(),
            GroupKind::Static { .. } => None,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Root structure of the groups file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupsDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Groups keyed by slug, in insertion order.
    #[serde(default)]
    pub groups: IndexMap<String, Group>,
}

impl Default for GroupsDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            groups: IndexMap::new(),
        }
    }
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// Three-way update for optional fields: leave alone, clear, or replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Apply the update to `target`. Returns `true` unless this is `Keep`.
    pub fn apply(self, target: &mut Option<T>) -> bool {
        match self {
            Self::Keep => false,
            Self::Clear => {
                *target = None;
                true
            }
            Self::Set(value) => {
                *target = Some(value);
                true
            }
        }
    }
}

/// Older documents write `null` for absent lists.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
