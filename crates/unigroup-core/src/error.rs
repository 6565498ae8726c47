// ── Core error types ──
//
// Errors surfaced by group CRUD and persistence. Pattern and address
// parsing failures never show up here: a bad rule is a non-match, not
// an error, so one broken pattern cannot hide the rest of an evaluation.

use thiserror::Error;

use crate::model::GroupType;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum GroupError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Group '{identifier}' not found")]
    NotFound { identifier: String },

    #[error("Group '{name}' already exists")]
    AlreadyExists { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Cannot {operation} on {actual} group '{identifier}' (requires a {expected} group)")]
    WrongKind {
        identifier: String,
        operation: &'static str,
        expected: GroupType,
        actual: GroupType,
    },

    #[error("Invalid groups document: {message}")]
    InvalidFormat { message: String },

    // ── Persistence errors ───────────────────────────────────────────
    #[error("Group store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize groups document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GroupError {
    pub(crate) fn not_found(identifier: &str) -> Self {
        Self::NotFound {
            identifier: identifier.to_owned(),
        }
    }
}
