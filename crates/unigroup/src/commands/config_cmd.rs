//! Config subcommand handlers.

use serde::Serialize;
use unigroup_config::{Config, config_path, load_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Resolved view of the configuration, including where groups are stored.
#[derive(Serialize)]
struct ResolvedConfig {
    config_file: String,
    config_file_exists: bool,
    store: String,
    #[serde(flatten)]
    config: Config,
}

fn detail(r: &ResolvedConfig) -> String {
    let exists = if r.config_file_exists { "" } else { " (not created)" };
    [
        format!("Config file:  {}{exists}", r.config_file),
        format!("Groups file:  {}", r.store),
        format!("Output:       {}", r.config.defaults.output),
        format!("Color:        {}", r.config.defaults.color),
    ]
    .join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = load_config()?;
            let path = config_path();
            let resolved = ResolvedConfig {
                config_file: path.display().to_string(),
                config_file_exists: path.exists(),
                store: config::store_path(global, &cfg).display().to_string(),
                config: cfg,
            };
            let out = output::render_single(&global.output_format(), &resolved, detail, |r| {
                r.store.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
