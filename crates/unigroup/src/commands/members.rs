//! Static membership handlers: add, remove, alias, members, clear.

use tabled::Tabled;
use unigroup_core::{FieldUpdate, GroupManager, GroupMember, normalize_mac};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct MemberRow {
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "MAC")]
    mac: String,
}

impl From<&GroupMember> for MemberRow {
    fn from(m: &GroupMember) -> Self {
        Self {
            alias: m.alias.clone().unwrap_or_else(|| "-".into()),
            mac: m.mac.clone(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn add(
    manager: &mut GroupManager,
    identifier: &str,
    macs: &[String],
    alias: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if alias.is_some() && macs.len() > 1 {
        return Err(CliError::Validation {
            field: "alias".into(),
            reason: "--alias can only be used with a single MAC".into(),
        });
    }

    for mac in macs {
        manager.add_member(identifier, mac, alias)?;
        let shown = alias.map_or_else(|| normalize_mac(mac), str::to_owned);
        output::print_status(global, Tone::Success, "Added", &shown);
    }
    Ok(())
}

pub fn remove(
    manager: &mut GroupManager,
    identifier: &str,
    members: &[String],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    for member in members {
        if manager.remove_member(identifier, member)? {
            output::print_status(global, Tone::Success, "Removed", member);
        } else {
            output::print_status(global, Tone::Warning, "Not found", member);
        }
    }
    Ok(())
}

pub fn alias(
    manager: &mut GroupManager,
    identifier: &str,
    member: &str,
    alias: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let update = alias.clone().map_or(FieldUpdate::Clear, FieldUpdate::Set);
    if !manager.update_member(identifier, member, update)? {
        return Err(CliError::NotFound {
            resource_type: "member".into(),
            identifier: member.into(),
            list_command: format!("members {identifier}"),
        });
    }

    match alias {
        Some(alias) => output::print_status(global, Tone::Success, "Set alias", &alias),
        None => output::print_status(global, Tone::Success, "Cleared alias for", member),
    }
    Ok(())
}

pub fn members(manager: &mut GroupManager, identifier: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let (slug, group) = util::require_group(manager, identifier)?;
    if group.members().is_none() {
        output::print_hint(
            global,
            &format!(
                "Auto groups have dynamic membership based on rules.\n\
                 Use: unigroup match {slug} --clients <FILE>"
            ),
        );
        return Ok(());
    }

    let members = manager.list_members(&slug)?;
    let format = global.output_format();
    if members.is_empty() && format == OutputFormat::Table {
        output::print_hint(global, "No members in group");
        return Ok(());
    }

    let out = output::render_list(&format, &members, |m| MemberRow::from(m), |m| m.mac.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn clear(manager: &mut GroupManager, identifier: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let (slug, group) = util::require_group(manager, identifier)?;
    let Some(count) = group.members().map(<[GroupMember]>::len) else {
        // Auto group: the manager reports the kind mismatch.
        manager.clear_members(&slug)?;
        return Ok(());
    };

    if count == 0 {
        output::print_hint(global, "Group has no members");
        return Ok(());
    }

    let prompt = format!("Remove all {count} members from '{}'?", group.name);
    if !util::confirm(&prompt, "clear members", global.yes)? {
        return Ok(());
    }

    manager.clear_members(&slug)?;
    output::print_status(global, Tone::Success, "Cleared", &format!("{count} members"));
    Ok(())
}
