//! Export / import handlers.

use std::path::Path;

use serde_json::Value;
use unigroup_core::GroupManager;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

pub fn export(manager: &mut GroupManager, file: Option<&Path>, global: &GlobalOpts) -> Result<(), CliError> {
    let doc = manager.export()?;
    let mut json = output::render_json_pretty(&doc)?;

    match file {
        Some(path) => {
            json.push('\n');
            std::fs::write(path, json)?;
            output::print_status(
                global,
                Tone::Success,
                "Exported",
                &format!("{} groups to {}", doc.groups.len(), path.display()),
            );
        }
        None => output::print_output(&json, global.quiet),
    }
    Ok(())
}

pub fn import(manager: &mut GroupManager, file: &Path, replace: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let document = util::read_json_file(file)?;
    let incoming = document
        .get("groups")
        .and_then(Value::as_object)
        .map_or(0, serde_json::Map::len);

    if replace {
        let prompt = format!("Replace all groups with {incoming} from file?");
        if !util::confirm(&prompt, "replace groups", global.yes)? {
            return Ok(());
        }
    }

    let count = manager.import(document, replace)?;
    let mode = if replace { "replaced store" } else { "merged" };
    output::print_status(global, Tone::Success, "Imported", &format!("{count} groups ({mode})"));
    Ok(())
}
