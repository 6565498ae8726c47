//! Group lifecycle handlers: list, show, create, edit, delete.

use serde::Serialize;
use tabled::Tabled;
use unigroup_core::{FieldUpdate, Group, GroupManager, GroupType, NewGroupKind};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::members::MemberRow;
use super::{rules, util};

// ── Serialized shape ────────────────────────────────────────────────

/// A group with its slug inlined, as emitted by `list` and `show`.
#[derive(Serialize)]
struct GroupEntry<'a> {
    slug: &'a str,
    #[serde(flatten)]
    group: &'a Group,
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Members")]
    members: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&GroupEntry<'_>> for GroupRow {
    fn from(e: &GroupEntry<'_>) -> Self {
        Self {
            slug: e.slug.to_owned(),
            name: e.group.name.clone(),
            kind: e.group.group_type().to_string(),
            members: e
                .group
                .members()
                .map_or_else(|| "(auto)".into(), |m| m.len().to_string()),
            description: e.group.description.clone().unwrap_or_default(),
        }
    }
}

fn detail(e: &GroupEntry<'_>) -> String {
    let group = e.group;
    let mut lines = vec![
        format!("Group:       {}", group.name),
        format!("Slug:        {}", e.slug),
        format!("Type:        {}", group.group_type()),
    ];
    if let Some(ref description) = group.description {
        lines.push(format!("Description: {description}"));
    }
    lines.push(format!("Created:     {}", group.created_at.format("%Y-%m-%d %H:%M")));
    lines.push(format!("Updated:     {}", group.updated_at.format("%Y-%m-%d %H:%M")));

    match group.members() {
        Some(members) => {
            lines.push(format!("Members:     {}", members.len()));
            if !members.is_empty() {
                let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();
                lines.push(String::new());
                lines.push(output::render_table(&rows));
            }
        }
        None => {
            lines.push("Rules:".into());
            match group.rules().filter(|r| !r.is_empty()) {
                Some(r) => lines.extend(rules::rule_lines(r).into_iter().map(|l| format!("  {l}"))),
                None => lines.push("  (none)".into()),
            }
        }
    }
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(manager: &mut GroupManager, global: &GlobalOpts) -> Result<(), CliError> {
    let groups = manager.list_groups()?;
    let format = global.output_format();

    if groups.is_empty() && format == OutputFormat::Table {
        output::print_hint(
            global,
            "No groups defined. Create one with:\n  unigroup create \"My Group\"",
        );
        return Ok(());
    }

    let entries: Vec<GroupEntry<'_>> = groups
        .iter()
        .map(|(slug, group)| GroupEntry { slug, group })
        .collect();
    let out = output::render_list(
        &format,
        &entries,
        |e| GroupRow::from(e),
        |e| e.slug.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn show(manager: &mut GroupManager, identifier: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let (slug, group) = util::require_group(manager, identifier)?;
    let entry = GroupEntry {
        slug: &slug,
        group: &group,
    };
    let out = output::render_single(&global.output_format(), &entry, detail, |e| e.slug.to_owned())?;
    output::print_output(&out, global.quiet);

    if group.group_type() == GroupType::Auto && global.output_format() == OutputFormat::Table {
        output::print_hint(
            global,
            &format!("See matching clients with: unigroup match {slug} --clients <FILE>"),
        );
    }
    Ok(())
}

pub fn create(
    manager: &mut GroupManager,
    name: &str,
    description: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (slug, group) = manager.create_group(name, description, NewGroupKind::Static)?;
    output::print_status(global, Tone::Success, "Created group", &format!("{} ({slug})", group.name));
    output::print_hint(global, &format!("Add members with: unigroup add {slug} <MAC>"));
    Ok(())
}

pub fn edit(
    manager: &mut GroupManager,
    identifier: &str,
    new_name: Option<&str>,
    description: FieldUpdate<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if new_name.is_none() && description == FieldUpdate::Keep {
        return Err(CliError::Validation {
            field: "edit".into(),
            reason: "nothing to change; pass --name, --description, or --clear-description".into(),
        });
    }

    if let Some(name) = new_name {
        if let Some(existing) = manager.rename_collision(identifier, name)? {
            let prompt = format!("Renaming to '{name}' will overwrite group '{existing}'. Continue?");
            if !util::confirm(&prompt, "overwrite group", global.yes)? {
                output::print_status(global, Tone::Muted, "Aborted", "no changes made");
                return Ok(());
            }
        }
    }

    let (slug, group) = manager.update_group(identifier, new_name, description)?;
    output::print_status(global, Tone::Success, "Updated group", &format!("{} ({slug})", group.name));
    Ok(())
}

pub fn delete(manager: &mut GroupManager, identifier: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let (slug, group) = util::require_group(manager, identifier)?;
    if !util::confirm(&format!("Delete group '{}'?", group.name), "delete group", global.yes)? {
        return Ok(());
    }
    manager.delete_group(&slug)?;
    output::print_status(global, Tone::Success, "Deleted group", &group.name);
    Ok(())
}
