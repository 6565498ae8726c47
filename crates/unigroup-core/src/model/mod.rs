// ── Domain model ──

pub mod client;
pub mod group;
pub mod identity;

pub use client::{ClientRecord, ClientView, ConnectionType};
pub use group::{
    AutoGroupRules, DOCUMENT_VERSION, FieldUpdate, Group, GroupKind, GroupMember, GroupType,
    GroupsDocument, NewGroupKind,
};
pub use identity::{normalize_mac, slugify};
