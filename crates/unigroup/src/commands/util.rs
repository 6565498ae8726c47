//! Shared helpers for command handlers.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use serde_json::Value;
use unigroup_core::{ClientRecord, GroupManager};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of guessing.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Resolve a group or fail with a `NotFound` pointing at `unigroup list`.
pub fn require_group(
    manager: &mut GroupManager,
    identifier: &str,
) -> Result<(String, unigroup_core::Group), CliError> {
    manager
        .get_group(identifier)?
        .ok_or_else(|| CliError::group_not_found(identifier))
}

/// Read and parse a JSON file. `-` reads stdin.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Read a client list: a JSON array of client objects, or an API-style
/// envelope with the array under `data`.
pub fn read_clients(path: &Path) -> Result<Vec<ClientRecord>, CliError> {
    let value = read_json_file(path)?;
    let list = match value {
        Value::Object(mut envelope) => envelope.remove("data").unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(list).map_err(|e| CliError::Validation {
        field: "clients".into(),
        reason: format!("expected an array of client objects: {e}"),
    })
}
