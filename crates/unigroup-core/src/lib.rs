//! Client group rule engine and persistent group store.
//!
//! This crate owns the group domain for the unigroup workspace. It performs
//! no network I/O: callers hand it already-fetched client records as plain
//! data and render whatever it returns.
//!
//! - **[`GroupManager`]** - Facade over a [`GroupStore`]. Lazily loads the
//!   groups document on first access, then handles group CRUD, static
//!   membership, auto-group rules, and import/export. Every mutation
//!   rewrites the whole document before returning.
//!
//! - **[`GroupStore`]** - JSON persistence at an injected path. A missing or
//!   corrupted file loads as an empty document; saves go through a temp file
//!   and an atomic rename.
//!
//! - **Matchers** ([`matcher`]) - [`Pattern`] handles exact, wildcard,
//!   regex (`~` prefix) and comma-separated OR patterns. [`AddressPattern`]
//!   adds CIDR and dash ranges for IP rules. Malformed patterns never error;
//!   they simply match nothing.
//!
//! - **Domain model** ([`model`]) - [`Group`] with a [`GroupKind`] sum type
//!   (static members vs. auto rules), [`AutoGroupRules`], and the
//!   [`ClientView`] trait the evaluator reads client fields through.
//!
//! The backing file has no locking. Concurrent writers race and the last
//! one wins.

pub mod error;
pub mod manager;
pub mod matcher;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::GroupError;
pub use manager::{GroupManager, client_matches_rules};
pub use matcher::{AddressPattern, CompiledRules, Pattern, ip_matches, pattern_matches};
pub use store::GroupStore;

pub use model::{
    AutoGroupRules, ClientRecord, ClientView, ConnectionType, FieldUpdate, Group, GroupKind,
    GroupMember, GroupType, GroupsDocument, NewGroupKind, normalize_mac, slugify,
};
