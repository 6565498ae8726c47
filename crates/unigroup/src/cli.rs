//! Clap derive structures for the `unigroup` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap and clap_complete may be used here; build.rs compiles this
//! file on its own to generate man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unigroup -- named client groups for UniFi networks
#[derive(Debug, Parser)]
#[command(
    name = "unigroup",
    version,
    about = "Organize UniFi clients into static and rule-based groups",
    long_about = "Maintain named groups of network clients.\n\n\
        Static groups hold an explicit list of MAC addresses. Auto groups hold\n\
        pattern rules that are evaluated against a client list at call time.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Groups file to operate on (overrides config)
    #[arg(long, env = "UNIGROUP_STORE", global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "UNIGROUP_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all groups
    #[command(alias = "ls")]
    List,

    /// Show a group's details, members, or rules
    Show {
        /// Group name or slug
        group: String,
    },

    /// Create a static group
    Create {
        /// Group name
        name: String,

        /// Description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Create an auto group from pattern rules
    #[command(after_help = RULE_SYNTAX_HELP)]
    Auto(AutoArgs),

    /// Rename a group or change its description
    Edit {
        /// Group name or slug
        group: String,

        /// New name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// New description
        #[arg(long, short = 'd', conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },

    /// Delete a group
    #[command(alias = "rm")]
    Delete {
        /// Group name or slug
        group: String,
    },

    /// Add members to a static group
    Add {
        /// Group name or slug
        group: String,

        /// Client MAC addresses (any separator style)
        #[arg(required = true, value_name = "MAC")]
        macs: Vec<String>,

        /// Alias for the member (single MAC only)
        #[arg(long, short = 'a')]
        alias: Option<String>,
    },

    /// Remove members from a static group
    Remove {
        /// Group name or slug
        group: String,

        /// Member MACs or aliases
        #[arg(required = true, value_name = "MEMBER")]
        members: Vec<String>,
    },

    /// Set or clear a member's alias
    Alias {
        /// Group name or slug
        group: String,

        /// Member MAC or current alias
        member: String,

        /// New alias (omit to clear)
        alias: Option<String>,

        /// Clear the alias
        #[arg(long, conflicts_with = "alias")]
        clear: bool,
    },

    /// List the members of a static group
    Members {
        /// Group name or slug
        group: String,
    },

    /// Remove every member from a static group
    Clear {
        /// Group name or slug
        group: String,
    },

    /// Replace the rules of an auto group
    #[command(after_help = RULE_SYNTAX_HELP)]
    Rules {
        /// Group name or slug
        group: String,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Show which clients from a client list belong to a group
    Match {
        /// Group name or slug
        group: String,

        #[command(flatten)]
        clients: ClientsArg,
    },

    /// Export all groups as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short = 'f', value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Import groups from a JSON export
    Import {
        /// JSON file to import
        file: PathBuf,

        /// Replace all existing groups instead of merging
        #[arg(long)]
        replace: bool,
    },

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

const RULE_SYNTAX_HELP: &str = "\
Rules of the same kind are OR'd, different kinds are AND'd.

Pattern syntax:
  Exact      Apple
  Wildcard   *phone*, iPhone*
  Regex      ~^iPhone-[0-9]+
  Multiple   Apple,Samsung

IP rules also accept CIDR (10.0.0.0/8) and ranges (192.168.1.100-200).
MAC rules are prefixes (AA:BB:CC).";

// ── Auto group arguments ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AutoArgs {
    /// Group name
    pub name: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Preview the group without creating it
    #[arg(long, alias = "preview")]
    pub dry_run: bool,

    /// Client list to evaluate the preview against (JSON, `-` for stdin)
    #[arg(long, short = 'c', value_name = "FILE|-", requires = "dry_run")]
    pub clients: Option<PathBuf>,
}

/// Pattern rules shared by `auto` and `rules`.
#[derive(Debug, Args)]
pub struct RuleArgs {
    /// Vendor / OUI patterns
    #[arg(long, value_name = "PATTERN")]
    pub vendor: Vec<String>,

    /// Client name patterns (falls back to hostname)
    #[arg(long = "name", value_name = "PATTERN")]
    pub name_pattern: Vec<String>,

    /// Hostname patterns
    #[arg(long, value_name = "PATTERN")]
    pub hostname: Vec<String>,

    /// Network / SSID patterns
    #[arg(long, value_name = "PATTERN")]
    pub network: Vec<String>,

    /// IP patterns, CIDR blocks, or ranges
    #[arg(long, value_name = "PATTERN")]
    pub ip: Vec<String>,

    /// MAC address prefixes
    #[arg(long, value_name = "PREFIX")]
    pub mac: Vec<String>,

    /// Connection type
    #[arg(
        long = "type",
        value_name = "TYPE",
        value_parser = ["wired", "wireless"],
        ignore_case = true
    )]
    pub conn_type: Vec<String>,
}

/// Source of a client list for evaluation.
#[derive(Debug, Args)]
pub struct ClientsArg {
    /// Client list as JSON: an array of client objects, or an object with a
    /// `data` array. `-` reads stdin.
    #[arg(long, short = 'c', value_name = "FILE|-")]
    pub clients: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
