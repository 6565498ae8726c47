//! Command dispatch: bridges CLI args -> GroupManager calls -> output formatting.

pub mod config_cmd;
pub mod groups;
pub mod members;
pub mod rules;
pub mod transfer;
pub mod util;

use unigroup_core::{FieldUpdate, GroupManager};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, manager: &mut GroupManager, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::List => groups::list(manager, global),
        Command::Show { group } => groups::show(manager, &group, global),
        Command::Create { name, description } => groups::create(manager, &name, description, global),
        Command::Auto(args) => rules::auto(manager, args, global),
        Command::Edit {
            group,
            name,
            description,
            clear_description,
        } => {
            let description = match (description, clear_description) {
                (Some(text), _) => FieldUpdate::Set(text),
                (None, true) => FieldUpdate::Clear,
                (None, false) => FieldUpdate::Keep,
            };
            groups::edit(manager, &group, name.as_deref(), description, global)
        }
        Command::Delete { group } => groups::delete(manager, &group, global),
        Command::Add { group, macs, alias } => members::add(manager, &group, &macs, alias.as_deref(), global),
        Command::Remove { group, members: list } => members::remove(manager, &group, &list, global),
        Command::Alias {
            group,
            member,
            alias,
            clear,
        } => {
            let alias = if clear { None } else { alias };
            members::alias(manager, &group, &member, alias, global)
        }
        Command::Members { group } => members::members(manager, &group, global),
        Command::Clear { group } => members::clear(manager, &group, global),
        Command::Rules { group, rules: args } => rules::set_rules(manager, &group, args, global),
        Command::Match { group, clients } => rules::match_clients(manager, &group, &clients.clients, global),
        Command::Export { file } => transfer::export(manager, file.as_deref(), global),
        Command::Import { file, replace } => transfer::import(manager, &file, replace, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
