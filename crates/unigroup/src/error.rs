//! CLI error types with miette diagnostics.
//!
//! Maps `GroupError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use unigroup_config::ConfigError;
use unigroup_core::{GroupError, GroupType};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(unigroup::not_found),
        help("Run: unigroup {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(
        code(unigroup::conflict),
        help("Pick another name, or remove the existing one with: unigroup delete {identifier}")
    )]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    #[error("Cannot {operation} on {actual} group '{identifier}'")]
    #[diagnostic(code(unigroup::wrong_kind), help("{hint}"))]
    WrongKind {
        identifier: String,
        operation: String,
        actual: GroupType,
        hint: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unigroup::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid groups document: {message}")]
    #[diagnostic(
        code(unigroup::invalid_document),
        help("Expected a JSON object with a `groups` map, as written by `unigroup export`.")
    )]
    InvalidDocument { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(unigroup::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(unigroup::config),
        help("Inspect the active configuration with: unigroup config show")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(unigroup::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(unigroup::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(unigroup::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::WrongKind { .. }
            | Self::Validation { .. }
            | Self::InvalidDocument { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "group".into(),
            identifier: identifier.into(),
            list_command: "list".into(),
        }
    }
}

// ── GroupError → CliError mapping ────────────────────────────────────

impl From<GroupError> for CliError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::NotFound { identifier } => Self::group_not_found(identifier),

            GroupError::AlreadyExists { name } => Self::Conflict {
                resource_type: "group".into(),
                identifier: name,
            },

            GroupError::WrongKind {
                identifier,
                operation,
                expected,
                actual,
            } => {
                let hint = match expected {
                    GroupType::Static => format!(
                        "Auto groups match clients by rules. Change them with: \
                         unigroup rules {identifier} --vendor <PATTERN>"
                    ),
                    GroupType::Auto => format!(
                        "Static groups hold explicit members. Manage them with: \
                         unigroup add {identifier} <MAC>"
                    ),
                };
                Self::WrongKind {
                    identifier,
                    operation: operation.into(),
                    actual,
                    hint,
                }
            }

            GroupError::InvalidFormat { message } => Self::InvalidDocument { message },

            GroupError::Io(err) => Self::Io(err),

            GroupError::Serialization(err) => Self::Json(err),
        }
    }
}
