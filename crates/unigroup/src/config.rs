//! Bridges `unigroup-config` into the CLI: fills unset global flags from
//! config defaults and picks the groups file.

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::warn;

use unigroup_config::{Config, load_config};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

/// Load config, falling back to defaults when the file is unusable.
pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unusable config, using defaults");
        Config::default()
    })
}

/// Fill `--output` / `--color` from config when neither flag nor env set them.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&cfg.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&cfg.defaults.color, true).ok();
    }
}

/// Groups file: `--store` / `UNIGROUP_STORE`, then config, then the default.
pub fn store_path(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    global
        .store
        .clone()
        .unwrap_or_else(|| unigroup_config::groups_path(cfg))
}
